/*
    Module that bundles together the various encoding schemes used in Bitcoin
*/

pub mod base58;
pub mod sec1;
pub mod version_prefix;

pub use version_prefix::VersionPrefix;
