//! Infrastructure Layer
//!
//! HTTP gateway implementation and host adapters.

pub mod http;
pub mod nav;

pub use http::{HttpAuthGateway, HttpGatewayConfig};
pub use nav::LoggingNavigator;
