pub mod license_fingerprint;

pub use license_fingerprint::LicenseFingerprint;
