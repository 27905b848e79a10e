use std::fmt;

use ext_rdf::RdfFormat;

/// Input document format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    Json,
    Rdf(RdfFormat),
}

impl SourceFormat {
    pub const TURTLE: Self = Self::Rdf(RdfFormat::Turtle);
    pub const NTRIPLES: Self = Self::Rdf(RdfFormat::NTriples);

    /// Detect the format by file extension.
    ///
    /// Supported: `.json`, `.ttl`, `.nt`, `.nq`, `.rdf`/`.owl`/`.xml`.
    pub fn from_path(path: &str) -> Option<Self> {
        if path.to_lowercase().ends_with(".json") {
            return Some(Self::Json);
        }
        RdfFormat::from_path(path).map(Self::Rdf)
    }

    /// Pick a format from a content-type hint; unknown RDF hints mean Turtle.
    pub fn from_content_type(content_type: &str) -> Self {
        if content_type.to_ascii_lowercase().contains("json") {
            Self::Json
        } else {
            Self::Rdf(RdfFormat::from_content_type(content_type))
        }
    }

    /// Short names accepted on the command line.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "ttl" | "turtle" => Some(Self::TURTLE),
            "nt" | "ntriples" | "n-triples" => Some(Self::NTRIPLES),
            "nq" | "nquads" | "n-quads" => Some(Self::Rdf(RdfFormat::NQuads)),
            "rdf" | "xml" | "rdfxml" | "owl" => Some(Self::Rdf(RdfFormat::RdfXml)),
            _ => None,
        }
    }

    /// Guess from content when nothing else is known: a leading `{` is JSON,
    /// a leading `<?xml` is RDF/XML, anything else Turtle.
    pub fn sniff(text: &str) -> Self {
        let head = text.trim_start();
        if head.starts_with('{') {
            Self::Json
        } else if head.starts_with("<?xml") || head.starts_with("<rdf:RDF") {
            Self::Rdf(RdfFormat::RdfXml)
        } else {
            Self::TURTLE
        }
    }

    /// Extension first, then content.
    pub fn detect(path: &str, text: &str) -> Self {
        Self::from_path(path).unwrap_or_else(|| Self::sniff(text))
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "JSON"),
            Self::Rdf(rdf) => write!(f, "{}", rdf.name()),
        }
    }
}
