//! Resource resolution: binds every image and attachment of a proc to the
//! resource it names.
//!
//! Decoding leaves each [`ResourceLink`] unresolved. This pass walks the
//! results of resource-producing operations (`images`, `attachments`) and
//! binds each link against the resource map of the result that contains it.
//!
//! Every link of the proc is looked up and checked before any of them is
//! bound, so a failed pass leaves the proc exactly as it was. Rebinding an
//! already resolved link yields the same resource, so running the pass twice
//! is harmless.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::model::{OperationResult, Proc, Resource, ResourceLink, ResultData};

/// Resolve all resource links of `proc`, returning it.
pub fn resolve(mut proc: Proc) -> Result<Proc> {
    resolve_in_place(&mut proc)?;
    Ok(proc)
}

/// Resolve all resource links of `proc` in place.
///
/// On error `proc` is left untouched.
pub fn resolve_in_place(proc: &mut Proc) -> Result<()> {
    if proc.documents().is_empty() {
        return Ok(());
    }
    proc.check_alignment()?;

    let positions: Vec<usize> = proc
        .operations()
        .iter()
        .enumerate()
        .filter(|(_, op)| op.kind().produces_resources())
        .map(|(index, _)| index)
        .collect();
    if positions.is_empty() {
        return Ok(());
    }

    let mut bindings = Vec::new();
    for (doc_index, doc) in proc.documents().iter().enumerate() {
        for &index in &positions {
            let Some(result) = doc.results().get(index) else {
                return Err(Error::ResultMismatch {
                    document_id: doc.id.clone(),
                    index,
                    expected: proc.operations()[index].tag().to_string(),
                    found: String::new(),
                });
            };
            let broken = |resource_id: &str| Error::BrokenReference {
                resource_id: resource_id.to_string(),
                document_id: doc.id.clone(),
                result_index: index,
            };
            bindings.push((doc_index, index, lookup_all(result, broken)?));
        }
    }

    let mut bound = 0usize;
    let documents = proc.documents_mut();
    for (doc_index, index, resources) in bindings {
        bound += bind_all(&mut documents[doc_index].results[index], resources);
    }

    log::debug!("Resolved {} resource links in proc {}", bound, proc.id);
    Ok(())
}

/// The resource of every entity in `result`, in entity order.
fn lookup_all<F>(result: &OperationResult, broken: F) -> Result<Vec<Arc<Resource>>>
where
    F: Fn(&str) -> Error,
{
    let find = |link: &ResourceLink| {
        link.lookup(&result.resources)
            .map(Arc::clone)
            .ok_or_else(|| broken(link.id()))
    };

    match &result.data {
        ResultData::Attachments(attachments) => {
            attachments.iter().map(|attachment| find(&attachment.link)).collect()
        }
        ResultData::Images(pages) => pages
            .iter()
            .flat_map(|page| page.images.iter())
            .map(|image| {
                let resource = find(&image.link)?;
                if !resource.is_bitmap() {
                    return Err(variant_mismatch(image.link.id(), &resource));
                }
                Ok(resource)
            })
            .collect(),
        _ => Ok(Vec::new()),
    }
}

/// Bind the entities of `result` to `resources`, as produced by [`lookup_all`].
fn bind_all(result: &mut OperationResult, resources: Vec<Arc<Resource>>) -> usize {
    let links: Vec<&mut ResourceLink> = match &mut result.data {
        ResultData::Attachments(attachments) => {
            attachments.iter_mut().map(|attachment| &mut attachment.link).collect()
        }
        ResultData::Images(pages) => pages
            .iter_mut()
            .flat_map(|page| page.images.iter_mut())
            .map(|image| &mut image.link)
            .collect(),
        _ => Vec::new(),
    };

    let count = links.len();
    for (link, resource) in links.into_iter().zip(resources) {
        link.bind(resource);
    }
    count
}

fn variant_mismatch(resource_id: &str, found: &Resource) -> Error {
    Error::VariantMismatch {
        resource_id: resource_id.to_string(),
        expected: "bitmap",
        found: found.variant_name(),
    }
}
