//! Procs: server-side processing runs applying operations to documents.

use super::{Operation, OperationResult, ProcessedDocument};
use crate::codec::tag::wire_tag;
use crate::codec::{self, node_kind, timestamp, DecodeContext, FromNode};
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeSet;

wire_tag! {
    /// Processing state of a proc, as reported by the service.
    pub enum ProcStatus : "proc status" {
        /// Accepted, not yet processed
        Pending => "pending",
        /// Processed; results are available
        Complete => "complete",
        /// Rejected by the service
        Refused => "refused",
    }
}

/// What a proc carries about its documents.
///
/// Procs that have not completed only name their documents; completed procs
/// deliver them along with their results.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcDocuments {
    /// IDs of the documents the proc will process
    Pending(BTreeSet<String>),
    /// Processed documents, in delivery order
    Processed(Vec<ProcessedDocument>),
}

/// A processing run.
#[derive(Debug, Clone, PartialEq)]
pub struct Proc {
    /// Proc ID
    pub id: String,

    /// Creation time
    pub created: DateTime<Utc>,

    /// Tags used to select the source documents, if any
    pub source_tags: BTreeSet<String>,

    operations: Vec<Operation>,

    pub status: ProcStatus,

    contents: ProcDocuments,
    pub(crate) response_body: Option<Value>,
}

#[derive(Deserialize)]
struct ProcHeader {
    id: String,
    #[serde(with = "timestamp")]
    created: DateTime<Utc>,
    #[serde(default, deserialize_with = "codec::null_as_default")]
    source_tags: BTreeSet<String>,
    status: ProcStatus,
    #[serde(default, deserialize_with = "codec::null_as_default")]
    docids: BTreeSet<String>,
}

impl Proc {
    /// Check if the proc has completed and carries results.
    pub fn is_complete(&self) -> bool {
        self.status == ProcStatus::Complete
    }

    /// Operations applied to every document, in order.
    ///
    /// Each processed document carries exactly one result per operation, at
    /// the same position.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn contents(&self) -> &ProcDocuments {
        &self.contents
    }

    /// Processed documents; empty unless the proc is complete.
    pub fn documents(&self) -> &[ProcessedDocument] {
        match &self.contents {
            ProcDocuments::Processed(documents) => documents,
            ProcDocuments::Pending(_) => &[],
        }
    }

    /// IDs of the documents awaiting processing, for procs that are not complete.
    pub fn pending_document_ids(&self) -> Option<&BTreeSet<String>> {
        match &self.contents {
            ProcDocuments::Pending(ids) => Some(ids),
            ProcDocuments::Processed(_) => None,
        }
    }

    /// The document a result of this proc belongs to.
    pub fn document_of(&self, result: &OperationResult) -> Option<&ProcessedDocument> {
        result.document.and_then(|index| self.documents().get(index))
    }

    /// Find a processed document by ID.
    pub fn document(&self, id: &str) -> Option<&ProcessedDocument> {
        self.documents().iter().find(|doc| doc.id == id)
    }

    /// The raw JSON this proc was decoded from, when response capture is enabled.
    pub fn response_body(&self) -> Option<&Value> {
        self.response_body.as_ref()
    }

    pub(crate) fn documents_mut(&mut self) -> &mut [ProcessedDocument] {
        match &mut self.contents {
            ProcDocuments::Processed(documents) => documents,
            ProcDocuments::Pending(_) => &mut [],
        }
    }

    /// Check that every document has exactly one result per operation, in
    /// operation order.
    pub(crate) fn check_alignment(&self) -> Result<()> {
        for doc in self.documents() {
            let results = doc.results();
            let len = results.len().max(self.operations.len());
            for index in 0..len {
                let expected = self.operations.get(index).map(Operation::tag);
                let found = results.get(index).map(OperationResult::tag);
                if expected != found {
                    return Err(Error::ResultMismatch {
                        document_id: doc.id.clone(),
                        index,
                        expected: expected.unwrap_or_default().to_string(),
                        found: found.unwrap_or_default().to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl FromNode for Proc {
    fn from_node(node: Value, ctx: &DecodeContext) -> Result<Self> {
        let mut object = match node {
            Value::Object(object) => object,
            other => {
                return Err(Error::format(format!(
                    "expected a proc object, found {}",
                    node_kind(&other)
                )))
            }
        };

        let operations = match object.remove("operations") {
            None | Some(Value::Null) => Vec::new(),
            Some(node) => Vec::<Operation>::from_node(node, ctx)?,
        };
        let documents = match object.remove("documents") {
            None | Some(Value::Null) => Vec::new(),
            Some(node) => Vec::<ProcessedDocument>::from_node(node, ctx)?,
        };
        let header: ProcHeader = codec::from_node_plain(Value::Object(object))?;

        if !documents.is_empty() && !header.docids.is_empty() {
            return Err(Error::format(format!(
                "proc {} carries both docids and documents",
                header.id
            )));
        }

        let contents = if !documents.is_empty() || header.status == ProcStatus::Complete {
            ProcDocuments::Processed(documents)
        } else {
            ProcDocuments::Pending(header.docids)
        };

        let mut proc = Proc {
            id: header.id,
            created: header.created,
            source_tags: header.source_tags,
            operations,
            status: header.status,
            contents,
            response_body: None,
        };
        proc.check_alignment()?;

        for (index, doc) in proc.documents_mut().iter_mut().enumerate() {
            for result in &mut doc.results {
                result.document = Some(index);
            }
        }

        log::debug!(
            "Decoded proc {} ({}, {} operations, {} documents)",
            proc.id,
            proc.status,
            proc.operations.len(),
            proc.documents().len()
        );
        Ok(proc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use url::Url;

    fn ctx() -> DecodeContext {
        DecodeContext::new(Url::parse("https://api.pdfdata.io/v1/").unwrap())
    }

    fn document(id: &str, results: Value) -> Value {
        json!({
            "id": id,
            "filename": format!("{}.pdf", id),
            "created": "2016-06-15T19:19:19Z",
            "pagecount": 1,
            "results": results
        })
    }

    #[test]
    fn test_pending_proc() {
        let node = json!({
            "id": "proc_1",
            "created": "2016-06-15T19:19:19Z",
            "status": "PENDING",
            "source_tags": null,
            "operations": [{"op": "metadata"}],
            "docids": ["doc_a", "doc_b"]
        });
        let proc = Proc::from_node(node, &ctx()).unwrap();
        assert_eq!(proc.status, ProcStatus::Pending);
        assert!(!proc.is_complete());
        assert!(proc.documents().is_empty());
        assert_eq!(proc.pending_document_ids().unwrap().len(), 2);
        assert_eq!(proc.operations, vec![Operation::Metadata]);
    }

    #[test]
    fn test_complete_proc_links_results_to_documents() {
        let node = json!({
            "id": "proc_2",
            "created": "2016-06-15T19:19:19Z",
            "status": "complete",
            "operations": [{"op": "metadata"}, {"op": "text"}],
            "documents": [
                document("doc_a", json!([{"op": "metadata", "data": {}}, {"op": "text", "data": []}])),
                document("doc_b", json!([{"op": "metadata", "data": {}}, {"op": "text", "failure": true}]))
            ]
        });
        let proc = Proc::from_node(node, &ctx()).unwrap();
        assert!(proc.is_complete());
        assert!(proc.pending_document_ids().is_none());

        let doc_b = &proc.documents()[1];
        let result = &doc_b.results()[1];
        assert!(result.is_failure());
        assert_eq!(proc.document_of(result).unwrap().id, "doc_b");
        assert_eq!(proc.document("doc_a").unwrap().results().len(), 2);
    }

    #[test]
    fn test_misaligned_results() {
        let node = json!({
            "id": "proc_3",
            "created": "2016-06-15T19:19:19Z",
            "status": "complete",
            "operations": [{"op": "metadata"}, {"op": "text"}],
            "documents": [document("doc_a", json!([{"op": "text"}, {"op": "metadata"}]))]
        });
        let err = Proc::from_node(node, &ctx()).unwrap_err();
        match err {
            Error::ResultMismatch { document_id, index, expected, found } => {
                assert_eq!(document_id, "doc_a");
                assert_eq!(index, 0);
                assert_eq!(expected, "metadata");
                assert_eq!(found, "text");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_missing_result() {
        let node = json!({
            "id": "proc_4",
            "created": "2016-06-15T19:19:19Z",
            "status": "complete",
            "operations": [{"op": "metadata"}, {"op": "images"}],
            "documents": [document("doc_a", json!([{"op": "metadata"}]))]
        });
        let err = Proc::from_node(node, &ctx()).unwrap_err();
        assert!(matches!(err, Error::ResultMismatch { index: 1, ref found, .. } if found.is_empty()));
    }

    #[test]
    fn test_docids_and_documents_exclusive() {
        let node = json!({
            "id": "proc_5",
            "created": "2016-06-15T19:19:19Z",
            "status": "complete",
            "operations": [],
            "docids": ["doc_a"],
            "documents": [document("doc_a", json!([]))]
        });
        let err = Proc::from_node(node, &ctx()).unwrap_err();
        assert!(matches!(err, Error::Format { .. }));
    }

    #[test]
    fn test_unknown_status() {
        let node = json!({
            "id": "proc_6",
            "created": "2016-06-15T19:19:19Z",
            "status": "exploded",
            "operations": []
        });
        let err = Proc::from_node(node, &ctx()).unwrap_err();
        assert!(matches!(err, Error::Format { .. }));
        assert!(err.to_string().contains("exploded"));
    }

    #[test]
    fn test_unknown_operation_in_proc() {
        let node = json!({
            "id": "proc_7",
            "created": "2016-06-15T19:19:19Z",
            "status": "pending",
            "operations": [{"op": "unknown-op"}]
        });
        let err = Proc::from_node(node, &ctx()).unwrap_err();
        assert!(matches!(err, Error::UnknownVariant { .. }));
    }
}
