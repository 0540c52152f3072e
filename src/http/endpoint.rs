use std::{fmt, str::FromStr};

use url::Url;

use crate::error::{ClientError, ClientResult};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8080;

/// Result format requested from the validation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Media {
    #[default]
    Text,
    Html,
    Xml,
    Json,
    Zip,
}

impl Media {
    pub fn as_str(&self) -> &'static str {
        match self {
            Media::Text => "text",
            Media::Html => "html",
            Media::Xml => "xml",
            Media::Json => "json",
            Media::Zip => "zip",
        }
    }
}

impl fmt::Display for Media {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Media {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "text" => Ok(Media::Text),
            "html" | "xhtml" => Ok(Media::Html),
            "xml" => Ok(Media::Xml),
            "json" => Ok(Media::Json),
            "zip" => Ok(Media::Zip),
            other => Err(format!("unsupported media {other}")),
        }
    }
}

/// Disclosure-system flavor of the validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    Standard,
    Sec,
    Edgar,
}

impl Flavor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Flavor::Standard => "standard",
            Flavor::Sec => "sec",
            Flavor::Edgar => "edgar",
        }
    }
}

impl FromStr for Flavor {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "standard" => Ok(Flavor::Standard),
            "sec" => Ok(Flavor::Sec),
            "edgar" => Ok(Flavor::Edgar),
            other => Err(format!("unsupported flavor {other}")),
        }
    }
}

/// Query parameters of a `/rest/xbrl/.../validation` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationQuery {
    pub media: Media,
    pub flavor: Option<Flavor>,
    pub imports: Vec<String>,
    pub log_file: Option<String>,
    pub flags: Vec<String>,
}

impl ValidationQuery {
    pub fn new(media: Media) -> Self {
        Self {
            media,
            ..Self::default()
        }
    }

    pub fn flavor(mut self, flavor: Flavor) -> Self {
        self.flavor = Some(flavor);
        self
    }

    pub fn import(mut self, file: impl Into<String>) -> Self {
        self.imports.push(file.into());
        self
    }

    pub fn log_file(mut self, name: impl Into<String>) -> Self {
        self.log_file = Some(name.into());
        self
    }

    /// Adds a parameter sent without a value, e.g. `formulaAsserResultCounts`.
    pub fn flag(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.flags.contains(&name) {
            self.flags.push(name);
        }
        self
    }

    fn append_to(&self, url: &mut Url, file_param: Option<&str>) {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("media", self.media.as_str());
        if let Some(flavor) = self.flavor {
            pairs.append_pair("flavor", flavor.as_str());
        }
        if !self.imports.is_empty() {
            pairs.append_pair("import", &self.imports.join("|"));
        }
        if let Some(log_file) = &self.log_file {
            pairs.append_pair("logFile", log_file);
        }
        for flag in &self.flags {
            pairs.append_key_only(flag);
        }
        if let Some(file) = file_param {
            pairs.append_pair("file", file);
        }
    }
}

/// How the document to validate is named in the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationTarget {
    /// Embedded in the URL path: `/rest/xbrl/<path>/validation/xbrl`.
    Path(String),
    /// Passed as `?file=`: `/rest/xbrl/validation?file=<path>`.
    FileParam(String),
    /// No file named; the server discovers entry points in the POSTed archive.
    Uploaded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoint {
    pub scheme: String,
    pub host: String,
    pub port: u16,
}

impl Default for ServiceEndpoint {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT)
    }
}

impl ServiceEndpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            scheme: "http".to_string(),
            host: host.into(),
            port,
        }
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    pub fn base_url(&self) -> ClientResult<Url> {
        let raw = format!("{}://{}:{}/", self.scheme, self.host, self.port);
        Url::parse(&raw).map_err(|err| ClientError::InvalidUrl {
            url: raw.clone(),
            reason: err.to_string(),
        })
    }

    pub fn validation_url(
        &self,
        target: &ValidationTarget,
        query: &ValidationQuery,
    ) -> ClientResult<Url> {
        let mut url = self.base_url()?;
        let file_param = match target {
            ValidationTarget::Path(path) => {
                let mut segments = vec!["rest", "xbrl"];
                segments.extend(instance_segments(path));
                segments.extend(["validation", "xbrl"]);
                set_path(&mut url, &segments)?;
                None
            }
            ValidationTarget::FileParam(path) => {
                set_path(&mut url, &["rest", "xbrl", "validation"])?;
                Some(path.as_str())
            }
            ValidationTarget::Uploaded => {
                set_path(&mut url, &["rest", "xbrl", "validation"])?;
                None
            }
        };
        query.append_to(&mut url, file_param);
        Ok(url)
    }

    /// URL for POSTing an archive that the service stores as `instance_id`.
    pub fn post_validation_url(
        &self,
        instance_id: &str,
        import: Option<&str>,
    ) -> ClientResult<Url> {
        let mut query = ValidationQuery::new(Media::Text);
        if let Some(file) = import {
            query = query.import(file);
        }
        let query = query.flag("formulaAsserResultCounts");
        self.validation_url(&ValidationTarget::Path(instance_id.to_string()), &query)
    }

    pub fn get_validation_url(&self, instance_path: &str) -> ClientResult<Url> {
        self.validation_url(
            &ValidationTarget::Path(instance_path.to_string()),
            &ValidationQuery::new(Media::Text),
        )
    }

    pub fn about_url(&self) -> ClientResult<Url> {
        self.service_url(&["about"])
    }

    pub fn help_url(&self) -> ClientResult<Url> {
        self.service_url(&["help"])
    }

    pub fn stop_url(&self) -> ClientResult<Url> {
        self.service_url(&["rest", "stopWebServer"])
    }

    fn service_url(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url()?;
        set_path(&mut url, segments)?;
        Ok(url)
    }
}

/// Splits an instance path on either separator. A leading separator is kept
/// as an empty segment so absolute paths survive as `//abs/path`.
fn instance_segments(path: &str) -> impl Iterator<Item = &str> {
    let absolute = path.starts_with(['/', '\\']);
    let rest = path.split(['/', '\\']).filter(|segment| !segment.is_empty());
    absolute.then_some("").into_iter().chain(rest)
}

fn set_path(url: &mut Url, segments: &[&str]) -> ClientResult<()> {
    let raw = url.to_string();
    let mut path = url.path_segments_mut().map_err(|_| ClientError::InvalidUrl {
        url: raw,
        reason: "URL cannot carry a path".to_string(),
    })?;
    path.clear().extend(segments);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn post_validation_url_matches_service_layout() {
        let endpoint = ServiceEndpoint::default();
        let url = endpoint
            .post_validation_url("filing-42", Some("extra-formula.xml"))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/rest/xbrl/filing-42/validation/xbrl\
             ?media=text&import=extra-formula.xml&formulaAsserResultCounts"
        );
    }

    #[test]
    fn get_validation_url_accepts_both_separators() {
        let endpoint = ServiceEndpoint::new("arelle.internal", 9000);
        let windows = endpoint.get_validation_url(r"c:\filings\a b.xbrl").unwrap();
        assert_eq!(
            windows.as_str(),
            "http://arelle.internal:9000/rest/xbrl/c:/filings/a%20b.xbrl/validation/xbrl?media=text"
        );

        let absolute = endpoint.get_validation_url("/srv/filings/report.xbrl").unwrap();
        assert_eq!(
            absolute.path(),
            "/rest/xbrl//srv/filings/report.xbrl/validation/xbrl"
        );
    }

    #[test]
    fn validation_url_supports_file_parameter_and_options() {
        let query = ValidationQuery::new(Media::Zip)
            .flavor(Flavor::Sec)
            .import("a.xml")
            .import("b.xml")
            .log_file("logFile.txt")
            .flag("efm-pragmatic")
            .flag("efm-pragmatic");
        let url = ServiceEndpoint::default()
            .validation_url(&ValidationTarget::FileParam("i00200gd.htm".into()), &query)
            .unwrap();
        assert_eq!(url.path(), "/rest/xbrl/validation");
        assert_eq!(
            url.query(),
            Some(
                "media=zip&flavor=sec&import=a.xml%7Cb.xml&logFile=logFile.txt\
                 &efm-pragmatic&file=i00200gd.htm"
            )
        );
    }

    #[test]
    fn uploaded_target_omits_file() {
        let url = ServiceEndpoint::default()
            .validation_url(&ValidationTarget::Uploaded, &ValidationQuery::default())
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/rest/xbrl/validation?media=text");
    }

    #[test]
    fn service_probe_urls() {
        let endpoint = ServiceEndpoint::new("127.0.0.1", 8090);
        assert_eq!(endpoint.about_url().unwrap().as_str(), "http://127.0.0.1:8090/about");
        assert_eq!(endpoint.help_url().unwrap().path(), "/help");
        assert_eq!(endpoint.stop_url().unwrap().path(), "/rest/stopWebServer");
    }

    #[test]
    fn base_url_rejects_bad_hosts() {
        let err = ServiceEndpoint::new("bad host", 80).base_url().unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl { .. }));
    }

    #[test]
    fn media_and_flavor_parse_case_insensitively() {
        assert_eq!("XML".parse::<Media>().unwrap(), Media::Xml);
        assert_eq!("xhtml".parse::<Media>().unwrap(), Media::Html);
        assert!("pdf".parse::<Media>().is_err());
        assert_eq!("Edgar".parse::<Flavor>().unwrap(), Flavor::Edgar);
    }
}
