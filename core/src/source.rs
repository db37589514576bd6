//! A configured feature API: request builder plus transport.
//!
//! # Design
//! `DataSource` is the fetch collaborator the model layer talks to. Each
//! call builds one request, executes it and parses the envelope; nothing is
//! kept between calls. Failures are returned unchanged as
//! `RemoteQueryError`.

use tracing::debug;

use crate::client::{validate_layer, FeatureClient};
use crate::error::RemoteQueryError;
use crate::transport::Transport;
use crate::types::{Envelope, Record};

#[derive(Debug, Clone)]
pub struct DataSource<T> {
    client: FeatureClient,
    transport: T,
}

#[cfg(feature = "ureq")]
impl Default for DataSource<crate::transport::UreqTransport> {
    /// The default endpoint over a blocking `ureq` agent.
    fn default() -> Self {
        Self::new(FeatureClient::default(), crate::transport::UreqTransport::new())
    }
}

impl<T: Transport> DataSource<T> {
    pub fn new(client: FeatureClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &FeatureClient {
        &self.client
    }

    /// Fetch the first `page_size` records of `layer` with the total count.
    pub fn fetch_json(&self, layer: &str, page_size: u64) -> Result<Envelope, RemoteQueryError> {
        let request = self.client.build_page_request(layer, page_size)?;
        let response = self.transport.execute(&request)?;
        let envelope = self.client.parse_envelope(response)?;
        debug!(
            layer,
            page_size,
            count = envelope.count,
            records = envelope.records.len(),
            "fetched feature page"
        );
        Ok(envelope)
    }

    /// Total number of records in `layer`, read from a one-item page.
    pub fn get_data_count(&self, layer: &str) -> Result<u64, RemoteQueryError> {
        Ok(self.fetch_json(layer, 1)?.count)
    }

    /// Records of the first page of `page_size`. A zero size sends no request.
    pub fn fetch_records(&self, layer: &str, page_size: u64) -> Result<Vec<Record>, RemoteQueryError> {
        if page_size == 0 {
            validate_layer(layer)?;
            return Ok(Vec::new());
        }
        Ok(self.fetch_json(layer, page_size)?.records)
    }

    /// Every record of `layer`: a count request, then one page of that size.
    pub fn get_all_records(&self, layer: &str) -> Result<Vec<Record>, RemoteQueryError> {
        let count = self.get_data_count(layer)?;
        self.fetch_records(layer, count)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::http::{HttpRequest, HttpResponse};

    /// Replays canned responses and records the URLs it was asked for.
    struct Canned {
        responses: RefCell<Vec<HttpResponse>>,
        urls: RefCell<Vec<String>>,
    }

    impl Canned {
        fn new(bodies: &[&str]) -> Self {
            Self {
                responses: RefCell::new(
                    bodies
                        .iter()
                        .rev()
                        .map(|body| HttpResponse {
                            status: 200,
                            headers: Vec::new(),
                            body: body.as_bytes().to_vec(),
                        })
                        .collect(),
                ),
                urls: RefCell::new(Vec::new()),
            }
        }
    }

    impl Transport for Canned {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, RemoteQueryError> {
            self.urls.borrow_mut().push(request.url.clone());
            self.responses
                .borrow_mut()
                .pop()
                .ok_or_else(|| RemoteQueryError::Transport("no canned response left".to_string()))
        }
    }

    #[test]
    fn get_all_records_counts_then_fetches_that_many() {
        let transport = Canned::new(&[
            r#"{"num":"2","results":[{"feature_id":1}]}"#,
            r#"{"num":"2","results":[{"feature_id":1},{"feature_id":2}]}"#,
        ]);
        let source = DataSource::new(FeatureClient::new("http://api.test/feature"), &transport);

        let records = source.get_all_records("c1161").unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(
            *transport.urls.borrow(),
            vec![
                "http://api.test/feature?layers=c1161&pagenum=1".to_string(),
                "http://api.test/feature?layers=c1161&pagenum=2".to_string(),
            ]
        );
    }

    #[test]
    fn empty_collection_needs_one_request() {
        let transport = Canned::new(&[r#"{"num":0,"results":[]}"#]);
        let source = DataSource::new(FeatureClient::default(), &transport);

        assert!(source.get_all_records("c0000").unwrap().is_empty());
        assert_eq!(transport.urls.borrow().len(), 1);
    }

    #[test]
    fn zero_page_still_validates_layer() {
        let transport = Canned::new(&[]);
        let source = DataSource::new(FeatureClient::default(), &transport);

        let err = source.fetch_records("", 0).unwrap_err();
        assert!(matches!(err, RemoteQueryError::InvalidCollection(_)));
        assert!(transport.urls.borrow().is_empty());
    }

    #[test]
    fn transport_failure_is_surfaced() {
        let transport = Canned::new(&[]);
        let source = DataSource::new(FeatureClient::default(), &transport);

        let err = source.get_data_count("c1161").unwrap_err();
        assert!(matches!(err, RemoteQueryError::Transport(_)));
    }
}
