use std::{path::Path, time::Duration};

use reqwest::blocking::Client;

use crate::{
    error::{ClientError, ClientResult},
    http::{
        self, HttpMethod, HttpValidationRequest, HttpValidationResult, ServiceEndpoint,
        ValidationQuery, ValidationTarget,
    },
    process::{self, InvocationRequest, InvocationResult, RunningProcess},
};

/// Entry point for both ways of reaching Arelle: a spawned command line or
/// the REST validation service.
///
/// Every call is a single blocking exchange. The HTTP client keeps no idle
/// connections and sets no timeout, so a long validation is waited out and
/// its socket is closed when the call returns.
#[derive(Debug, Clone)]
pub struct ExternalValidatorClient {
    http: Client,
    endpoint: ServiceEndpoint,
}

impl ExternalValidatorClient {
    pub fn new(endpoint: ServiceEndpoint) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(None::<Duration>)
            .pool_max_idle_per_host(0)
            .build()
            .map_err(ClientError::HttpClient)?;
        Ok(Self { http, endpoint })
    }

    /// Client for the service at `http://localhost:8080`.
    pub fn local() -> ClientResult<Self> {
        Self::new(ServiceEndpoint::default())
    }

    pub fn endpoint(&self) -> &ServiceEndpoint {
        &self.endpoint
    }

    pub fn spawn_process(&self, request: &InvocationRequest) -> ClientResult<RunningProcess> {
        process::spawn_process(request)
    }

    pub fn run_process(&self, request: &InvocationRequest) -> ClientResult<InvocationResult> {
        process::run_process(request)
    }

    pub fn stream_process<F>(
        &self,
        request: &InvocationRequest,
        on_line: F,
    ) -> ClientResult<InvocationResult>
    where
        F: FnMut(&str),
    {
        process::stream_process(request, on_line)
    }

    /// POSTs the request body with its declared content type.
    pub fn post_validation(
        &self,
        request: &HttpValidationRequest,
    ) -> ClientResult<HttpValidationResult> {
        http::execute(
            &self.http,
            HttpMethod::Post,
            &request.url,
            request.content_type.as_deref(),
            request.body.as_deref(),
        )
    }

    pub fn get_validation(&self, url: &str) -> ClientResult<HttpValidationResult> {
        http::execute(&self.http, HttpMethod::Get, url, None, None)
    }

    /// Sends the request with whatever method it declares.
    pub fn send(&self, request: &HttpValidationRequest) -> ClientResult<HttpValidationResult> {
        http::execute(
            &self.http,
            request.method,
            &request.url,
            request.content_type.as_deref(),
            request.body.as_deref(),
        )
    }

    /// Uploads a zip archive to be validated as `instance_id`.
    pub fn validate_archive(
        &self,
        instance_id: &str,
        archive: &Path,
        import: Option<&str>,
    ) -> ClientResult<HttpValidationResult> {
        let url = self.endpoint.post_validation_url(instance_id, import)?;
        let request = HttpValidationRequest::post_file(url, archive)?;
        self.post_validation(&request)
    }

    /// Asks the service to validate a document it can reach by path or URL.
    pub fn validate_instance(
        &self,
        target: &ValidationTarget,
        query: &ValidationQuery,
    ) -> ClientResult<HttpValidationResult> {
        let url = self.endpoint.validation_url(target, query)?;
        self.get_validation(url.as_str())
    }

    pub fn about(&self) -> ClientResult<HttpValidationResult> {
        let url = self.endpoint.about_url()?;
        self.get_validation(url.as_str())
    }

    /// Asks the service to shut itself down.
    pub fn stop_service(&self) -> ClientResult<HttpValidationResult> {
        let url = self.endpoint.stop_url()?;
        self.get_validation(url.as_str())
    }
}
