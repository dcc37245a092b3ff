//! # pdfdata
//!
//! Client library for the PDFDATA.io extraction service.
//!
//! Requests are encoded as `multipart/form-data`; responses are decoded into
//! a typed entity graph where polymorphic operations and results are chosen
//! by their `op` tag, and images and attachments are linked to the resources
//! that carry their data.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfdata::{Client, ClientOptions, Operation, ProcConfig};
//!
//! fn main() -> pdfdata::Result<()> {
//!     let client = Client::new(ClientOptions::from_env()?)?;
//!
//!     let proc = client.procs().start(
//!         &ProcConfig::new()
//!             .with_files(["report.pdf"])
//!             .with_operations([Operation::Images, Operation::text()]),
//!     )?;
//!
//!     for doc in proc.documents() {
//!         for result in doc.results() {
//!             for page in result.image_pages().unwrap_or_default() {
//!                 for resource in page.images.iter().filter_map(|i| i.resource()) {
//!                     let bytes = client.fetch(resource)?;
//!                     println!("page {}: {} bytes", page.pagenum, bytes.len());
//!                 }
//!             }
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Offline decoding
//!
//! Stored or captured responses decode without a client:
//!
//! ```
//! use pdfdata::codec::{self, DecodeContext};
//! use pdfdata::Operation;
//! use url::Url;
//!
//! let ctx = DecodeContext::new(Url::parse("https://api.pdfdata.io/v1/").unwrap());
//! let ops: Vec<Operation> =
//!     codec::from_str(r#"[{"op":"metadata"},{"op":"text","layout":"decompose"}]"#, &ctx).unwrap();
//! assert_eq!(ops.len(), 2);
//! ```
//!
//! ## Features
//!
//! - `http` (default): blocking [`reqwest`] transport. Without it, supply
//!   your own [`client::Transport`] to [`Client::with_transport`].

pub mod client;
pub mod codec;
pub mod decode;
pub mod detect;
pub mod error;
pub mod model;
pub mod multipart;
pub mod registry;
pub mod resolve;

pub use client::{Client, ClientOptions, ProcConfig, Transport};
pub use codec::{DecodeContext, FromNode};
pub use decode::{RawResponse, ResponseDecoder};
pub use error::{Error, Result};
pub use model::{
    Attachment, Document, Image, Operation, OperationKind, OperationResult, PageTemplates, Proc,
    ProcStatus, ProcessedDocument, Region, Resource, ResultData, Template, TextLayout,
};
pub use registry::OperationRegistry;
