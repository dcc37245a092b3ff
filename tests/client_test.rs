//! Integration tests for the client facilities over a recording transport.

use pdfdata::client::{HttpRequest, Method};
use pdfdata::{
    Client, ClientOptions, Error, Operation, ProcConfig, ProcStatus, RawResponse, Result,
    Transport,
};
use std::collections::VecDeque;
use std::io::Write;
use std::sync::{Arc, Mutex};
use url::Url;

const COMPLETED: &str = include_str!("fixtures/completed-proc.json");
const PENDING: &str = include_str!("fixtures/pending-proc.json");

const DOCUMENT: &str = r#"{
    "id": "doc_5HnM2xRv8QaLp3Kw",
    "filename": "upload.pdf",
    "created": "2017-03-01T09:00:00Z",
    "expires": "2017-03-08T09:00:00Z",
    "tags": ["batch-7"],
    "pagecount": 4
}"#;

/// Records every request and answers from a queue.
#[derive(Default)]
struct MockTransport {
    requests: Mutex<Vec<HttpRequest>>,
    responses: Mutex<VecDeque<RawResponse>>,
}

impl MockTransport {
    fn answering<I>(responses: I) -> Arc<Self>
    where
        I: IntoIterator<Item = RawResponse>,
    {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            responses: Mutex::new(responses.into_iter().collect()),
        })
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn last_body(&self) -> String {
        let requests = self.requests.lock().unwrap();
        let body = requests.last().unwrap().body.as_deref().unwrap_or_default();
        String::from_utf8_lossy(body).into_owned()
    }
}

impl Transport for MockTransport {
    fn execute(&self, request: HttpRequest) -> Result<RawResponse> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| Error::Transport("no response queued".to_string()))
    }
}

fn json(body: impl Into<Vec<u8>>) -> RawResponse {
    RawResponse::new(200, "application/json;charset=UTF-8", body)
}

fn client(transport: &Arc<MockTransport>) -> Client {
    Client::with_transport(ClientOptions::new(), Arc::clone(transport))
}

#[test]
fn test_info() {
    let transport = MockTransport::answering([json(
        r#"{"message":"Welcome","api_version":"v1","build":"2017.03.01"}"#,
    )]);
    let info = client(&transport).info().get().unwrap();

    assert_eq!(info.api_version, "v1");
    let requests = transport.requests();
    assert_eq!(requests[0].method, Method::Get);
    assert_eq!(requests[0].url.as_str(), "https://api.pdfdata.io/v1/");
    assert!(requests[0].body.is_none());
}

#[test]
fn test_list_documents() {
    let transport = MockTransport::answering([json(format!("[{}]", DOCUMENT))]);
    let docs = client(&transport).documents().list().unwrap();

    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].page_count, 4);
    assert!(docs[0].has_tag("batch-7"));
    assert_eq!(
        transport.requests()[0].url.as_str(),
        "https://api.pdfdata.io/v1/documents?before=2099-12-31T23%3A59%3A59Z"
    );
}

#[test]
fn test_document_by_id() {
    let transport = MockTransport::answering([json(DOCUMENT)]);
    let doc = client(&transport)
        .documents()
        .by_id("doc_5HnM2xRv8QaLp3Kw")
        .unwrap();

    assert_eq!(doc.filename, "upload.pdf");
    assert_eq!(
        transport.requests()[0].url.path(),
        "/v1/documents/doc_5HnM2xRv8QaLp3Kw"
    );
}

#[test]
fn test_upload_tagged() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("upload.pdf");
    std::fs::File::create(&path)
        .unwrap()
        .write_all(b"%PDF-1.5\n%%EOF\n")
        .unwrap();

    let transport = MockTransport::answering([json(format!("[{}]", DOCUMENT))]);
    let docs = client(&transport)
        .documents()
        .upload_tagged(["batch-7"], [&path])
        .unwrap();
    assert_eq!(docs[0].id, "doc_5HnM2xRv8QaLp3Kw");

    let requests = transport.requests();
    let request = &requests[0];
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.url.path(), "/v1/documents");
    assert!(request
        .header("Content-Type")
        .unwrap()
        .starts_with("multipart/form-data; boundary="));

    let body = transport.last_body();
    assert!(body.contains("name=\"tag\"\r\nContent-Type: text/plain; charset=UTF-8\r\n\r\nbatch-7\r\n"));
    assert!(body.contains("name=\"file\"; filename=\"upload.pdf\"\r\nContent-Type: application/pdf\r\n"));
    assert!(body.contains("%PDF-1.5"));
}

#[test]
fn test_start_proc_requires_one_source_kind() {
    let transport = MockTransport::answering(Vec::<RawResponse>::new());
    let client = client(&transport);

    let err = client
        .procs()
        .start(&ProcConfig::new().with_operations([Operation::Metadata]))
        .unwrap_err();
    assert!(err
        .to_string()
        .contains("No source documents were specified, cannot create proc."));

    let err = client
        .procs()
        .start(
            &ProcConfig::new()
                .with_document_ids(["doc_1"])
                .with_tags(["invoices"]),
        )
        .unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
    assert!(err.to_string().contains("[docid, tag]"));

    assert!(transport.requests().is_empty());
}

#[test]
fn test_start_proc() {
    let transport = MockTransport::answering([json(COMPLETED)]);
    let proc = client(&transport)
        .procs()
        .start(
            &ProcConfig::new()
                .with_document_ids(["doc_3Bv7kXWcTd9ZfQq2"])
                .with_operations([
                    Operation::Images,
                    Operation::text(),
                    Operation::text_with_layout(pdfdata::TextLayout::Decompose),
                ])
                .with_wait(30),
        )
        .unwrap();

    assert_eq!(proc.status, ProcStatus::Complete);
    // Returned procs are already linked.
    let image = &proc.documents()[0].results()[0].image_pages().unwrap()[0].images[0];
    assert!(image.link().is_resolved());

    let requests = transport.requests();
    let request = &requests[0];
    assert_eq!(request.url.as_str(), "https://api.pdfdata.io/v1/procs");

    let body = transport.last_body();
    let docid = body.find("name=\"docid\"").unwrap();
    let wait = body.find("name=\"wait\"").unwrap();
    let operations = body.find("name=\"operations\"").unwrap();
    assert!(docid < wait && wait < operations);
    assert!(body.contains("\r\n\r\n30\r\n"));
    assert!(body.contains(
        r#"[{"op":"images"},{"layout":"preserve","op":"text"},{"layout":"decompose","op":"text"}]"#
    ));
}

#[test]
fn test_wait_omitted_when_unset() {
    let transport = MockTransport::answering([json(PENDING)]);
    client(&transport)
        .procs()
        .start(
            &ProcConfig::new()
                .with_tags(["invoices"])
                .with_operations([Operation::Metadata]),
        )
        .unwrap();

    let body = transport.last_body();
    assert!(!body.contains("name=\"wait\""));
    assert!(body.contains("name=\"tag\""));
}

#[test]
fn test_proc_by_id() {
    let transport = MockTransport::answering([json(PENDING)]);
    let proc = client(&transport)
        .procs()
        .by_id("proc_PVH4sNTR8D5pMBtyHjK8uh")
        .unwrap();

    assert_eq!(proc.status, ProcStatus::Pending);
    assert_eq!(proc.pending_document_ids().unwrap().len(), 2);
    assert!(proc.response_body().is_none());
    assert_eq!(
        transport.requests()[0].url.path(),
        "/v1/procs/proc_PVH4sNTR8D5pMBtyHjK8uh"
    );
}

#[test]
fn test_api_error() {
    let transport = MockTransport::answering([RawResponse::new(
        404,
        "application/json",
        r#"{"error":"No such proc: proc_x"}"#,
    )]);
    let err = client(&transport).procs().by_id("proc_x").unwrap_err();

    assert_eq!(err.status(), Some(404));
    match err {
        Error::Api { body, .. } => assert_eq!(body["error"], "No such proc: proc_x"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_non_json_error() {
    let transport =
        MockTransport::answering([RawResponse::new(503, "text/html", "<h1>Unavailable</h1>")]);
    let err = client(&transport).documents().list().unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert!(matches!(err, Error::Decode { ref message, .. } if message.contains("Unavailable")));
}

#[test]
fn test_capture_response_bodies() {
    let transport = MockTransport::answering([json(format!("[{},{}]", DOCUMENT, DOCUMENT))]);
    let client = Client::with_transport(
        ClientOptions::new().with_capture_response_bodies(true),
        Arc::clone(&transport),
    );
    let docs = client.documents().list().unwrap();

    assert_eq!(docs.len(), 2);
    for doc in &docs {
        assert_eq!(doc.response_body().unwrap()["filename"], "upload.pdf");
    }
}

#[test]
fn test_resource_downloads_stay_on_endpoint() {
    let png = b"\x89PNG\r\n\x1a\n".to_vec();
    let transport = MockTransport::answering([
        json(COMPLETED),
        RawResponse::new(200, "image/png", png.clone()),
        RawResponse::new(200, "image/png", png.clone()),
        RawResponse::new(200, "image/png", png.clone()),
    ]);
    let client = client(&transport);

    let proc = client.procs().by_id("proc_Ks3JqYb8cYwVn1uUoZ4tRe").unwrap();
    let resource = proc.documents()[0].results()[0].resource("res_b2").unwrap();
    assert_eq!(client.fetch(resource).unwrap(), png);

    assert_eq!(client.resources().by_id("res_a1").unwrap(), png);

    let foreign = Url::parse("https://elsewhere.example.com/v1/resources/res_a1?size=full").unwrap();
    assert_eq!(client.resources().by_url(&foreign).unwrap(), png);

    let urls: Vec<String> = transport
        .requests()
        .iter()
        .skip(1)
        .map(|r| r.url.to_string())
        .collect();
    assert_eq!(
        urls,
        [
            "https://api.pdfdata.io/v1/resources/res_b2",
            "https://api.pdfdata.io/v1/resources/res_a1",
            "https://api.pdfdata.io/v1/resources/res_a1?size=full",
        ]
    );
}

#[test]
fn test_save_proc_resources_by_suggested_filename() {
    let transport = MockTransport::answering([
        json(COMPLETED),
        RawResponse::new(200, "application/octet-stream", b"one".to_vec()),
        RawResponse::new(200, "application/octet-stream", b"two".to_vec()),
    ]);
    let client = client(&transport);
    let proc = client.procs().by_id("proc_Ks3JqYb8cYwVn1uUoZ4tRe").unwrap();

    let dir = tempfile::tempdir().unwrap();
    let result = &proc.documents()[0].results()[0];
    let mut ids: Vec<&String> = result.resources().keys().collect();
    ids.sort();
    for id in ids {
        let resource = result.resource(id).unwrap();
        let data = client.fetch(resource).unwrap();
        std::fs::write(dir.path().join(resource.suggested_filename(id)), data).unwrap();
    }

    assert_eq!(std::fs::read(dir.path().join("res_a1.png")).unwrap(), b"one");
    assert_eq!(std::fs::read(dir.path().join("res_b2.jpg")).unwrap(), b"two");
}

#[test]
fn test_failed_resource_download() {
    let transport = MockTransport::answering([RawResponse::new(
        410,
        "application/json",
        r#"{"error":"expired"}"#,
    )]);
    let err = client(&transport).resources().by_id("res_old").unwrap_err();
    assert!(matches!(err, Error::Api { status: 410, .. }));
}

#[test]
fn test_clients_for_different_endpoints_in_parallel() {
    let endpoints = ["https://api.pdfdata.io/v1", "https://eu.pdfdata.io/v1/"];

    std::thread::scope(|scope| {
        let handles: Vec<_> = endpoints
            .iter()
            .map(|endpoint| {
                scope.spawn(move || {
                    let transport = MockTransport::answering([json(COMPLETED)]);
                    let options = ClientOptions::new().with_endpoint_str(endpoint).unwrap();
                    let client = Client::with_transport(options, Arc::clone(&transport));
                    let proc = client.procs().by_id("proc_Ks3JqYb8cYwVn1uUoZ4tRe").unwrap();
                    let result = &proc.documents()[0].results()[0];
                    result.resource("res_a1").unwrap().url().to_string()
                })
            })
            .collect();

        let urls: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(
            urls,
            [
                "https://api.pdfdata.io/v1/resources/res_a1",
                "https://eu.pdfdata.io/v1/resources/res_a1",
            ]
        );
    });
}
