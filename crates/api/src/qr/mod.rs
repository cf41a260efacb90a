//! QR artifact encoding.

pub mod encoder;

pub use encoder::PngQrEncoder;
