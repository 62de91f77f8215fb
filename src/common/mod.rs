/// Shared helpers used across the OPC and PresentationML layers.
pub mod xml;
