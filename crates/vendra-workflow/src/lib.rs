//! # vendra-workflow: Session State and Invoice Orchestration
//!
//! The application layer of Vendra POS: everything between the pure core
//! and the ERP client.
//!
//! ## Module Organization
//! ```text
//! vendra_workflow/
//! ├── lib.rs          ◄─── You are here (exports)
//! ├── storage.rs      ◄─── KeyStore trait, MemoryStore, FileStore, keys
//! ├── session.rs      ◄─── Session guard, login bookkeeping, TokenStore
//! ├── offline.rs      ◄─── The offline invoice-draft blob
//! ├── workflow.rs     ◄─── InvoiceWorkflow: send/cancel/recall/auto-save
//! ├── directory.rs    ◄─── Customer directory view
//! ├── lookup.rs       ◄─── Product lookup + stock overview views
//! ├── history.rs      ◄─── Recall list + previous-invoices views
//! └── error.rs        ◄─── WorkflowError
//! ```
//!
//! ## State Ownership
//! Each view owns its fetched rows, its search text, and a pager; the
//! workflow owns the one draft. Shared state is limited to the two
//! key-value stores behind [`Session`], matching how the terminal has
//! always shared a token, a few cached identifiers, and at most one
//! offline draft blob.

pub mod directory;
pub mod error;
pub mod history;
pub mod lookup;
pub mod offline;
pub mod session;
pub mod storage;
pub mod workflow;

pub use directory::{CustomerDirectory, CustomerForm};
pub use error::{WorkflowError, WorkflowResult};
pub use history::{PreviousInvoices, RecallList};
pub use lookup::{ProductLookup, ProductSelection, StockOverview};
pub use offline::{DraftSaveReason, OfflineDraft};
pub use session::{GuardDecision, Session};
pub use storage::{default_session_path, keys, FileStore, KeyStore, MemoryStore};
pub use workflow::{InvoiceWorkflow, PersistOutcome, RemoteCancel, SendReceipt};
