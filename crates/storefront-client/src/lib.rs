//! # storefront-client: Remote Catalog & Order Service
//!
//! The only crate in the workspace that performs network or config file I/O.
//!
//! ## Components
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     storefront-client (THIS CRATE)                      │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────────┐   │
//! │  │ StoreTransport  │   │  HttpTransport  │   │   ClientConfig      │   │
//! │  │ (transport.rs)  │◄──│  (http.rs)      │◄──│   (config.rs)       │   │
//! │  │                 │   │                 │   │                     │   │
//! │  │ fetch_catalog   │   │ reqwest + retry │   │ TOML + env + checks │   │
//! │  │ submit_order    │   │ CDN resolution  │   │                     │   │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod transport;

pub use config::{ApiSettings, ClientConfig, RetrySettings};
pub use error::{ClientError, ClientResult};
pub use http::HttpTransport;
pub use transport::StoreTransport;
