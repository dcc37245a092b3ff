//! Entity graph produced by decoding service responses.
//!
//! A completed [`Proc`] owns its [`ProcessedDocument`]s, each document owns
//! its [`OperationResult`]s (aligned with the proc's operations), and each
//! result owns the [`Resource`]s its entities refer to. [`Image`]s and
//! [`Attachment`]s name their resource by ID until the resolver binds them.

mod document;
mod entity;
mod geometry;
mod info;
mod operation;
mod proc;
mod resource;
mod result;
mod templates;

pub use document::{Document, ProcessedDocument};
pub use entity::{Attachment, Image, ResourceLink};
pub use geometry::{Bounds, Dimensions};
pub use info::Info;
pub use operation::{Operation, OperationKind, TextLayout};
pub use proc::{Proc, ProcDocuments, ProcStatus};
pub use resource::Resource;
pub use result::{
    ImagePage, MetadataFields, OperationResult, ResultData, TemplateMatch, TextPage,
};
pub use templates::{PageTemplates, Region, Template};
