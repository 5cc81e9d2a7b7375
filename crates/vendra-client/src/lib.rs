//! # vendra-client: ERP REST Client
//!
//! Everything that talks to the backend ERP lives in this crate.
//!
//! ## Module Organization
//! ```text
//! vendra_client/
//! ├── lib.rs          ◄─── You are here (exports + api accessors)
//! ├── http.rs         ◄─── ApiClient: base URL, bearer injection, timeout
//! ├── envelope.rs     ◄─── Response envelope normalization
//! ├── identity.rs     ◄─── Token claims, IdentityProvider
//! ├── wire.rs         ◄─── Decimal/cents and lenient value conversions
//! ├── auth.rs         ◄─── POST /auth/login
//! ├── customers.rs    ◄─── /pos/customers, /pos/customer
//! ├── invoices.rs     ◄─── /pos/invoices, /pos/invoice, items, status
//! ├── stocks.rs       ◄─── /store/items, /store/stocks
//! └── error.rs        ◄─── ClientError
//! ```
//!
//! ## Design Rules
//! - No retries: the single alternate-value fallbacks around draft-save and
//!   cancel statuses belong to the workflow, not here
//! - Failure handling is the caller's: this crate returns typed errors and
//!   extracts server messages, nothing more
//! - Wire tolerance is concentrated in the record types and the envelope
//!   module; nothing above this crate probes JSON shapes

pub mod auth;
pub mod customers;
pub mod envelope;
pub mod error;
pub mod http;
pub mod identity;
pub mod invoices;
pub mod stocks;
pub mod wire;

pub use auth::{AuthApi, LoginOutcome};
pub use customers::{CustomerRecord, CustomersApi, NewCustomer};
pub use error::{ClientError, ClientResult};
pub use http::{resolve_base_url, ApiClient, StaticToken, TokenStore};
pub use identity::{IdentityProvider, TokenClaims, TokenIdentity};
pub use invoices::{
    InvoiceItemRecord, InvoiceRecord, InvoicesApi, NewInvoice, NewInvoiceItem,
};
pub use stocks::{ItemRecord, StockRecord, StoreApi};

// =============================================================================
// Endpoint Accessors
// =============================================================================
// The endpoint wrappers borrow the client, so call sites read as
// `client.invoices().create(..)` without cloning anything.

impl ApiClient {
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi { client: self }
    }

    pub fn customers(&self) -> CustomersApi<'_> {
        CustomersApi { client: self }
    }

    pub fn invoices(&self) -> InvoicesApi<'_> {
        InvoicesApi { client: self }
    }

    pub fn store(&self) -> StoreApi<'_> {
        StoreApi { client: self }
    }
}
