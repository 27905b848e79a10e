//! Well-known predicates and the reserved KgView namespaces.

use smol_str::SmolStr;

use crate::model::{Term, Triple, percent_decode};

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const SCHEMA: &str = "http://schema.org/";
pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
pub const SCHEMA_DESCRIPTION: &str = "http://schema.org/description";

/// Base namespace for IRIs minted on export.
pub const EX: &str = "http://example.org/";
/// Generic property namespace: `exprop:<slug>` literals round-trip `props`.
pub const EXPROP: &str = "http://example.org/prop/";

/// Predicates whose literal object overwrites the subject's label/name.
pub const LABEL_PREDICATES: &[&str] = &[
    RDFS_LABEL,
    "http://www.w3.org/2004/02/skos/core#prefLabel",
    "http://xmlns.com/foaf/0.1/name",
    "http://schema.org/name",
    "https://schema.org/name",
];

/// Predicates whose literal object becomes `props.description`.
pub const DESCRIPTION_PREDICATES: &[&str] = &[
    SCHEMA_DESCRIPTION,
    "https://schema.org/description",
    "http://purl.org/dc/terms/description",
    "http://purl.org/dc/elements/1.1/description",
];

/// What the compiler does with a triple.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TripleRole {
    /// Collapses into the subject's label/name.
    Label,
    /// Collapses into `props.description`.
    Description,
    /// Collapses into `props[key]`.
    Property(SmolStr),
    /// Materialized as an edge.
    Statement,
}

/// Classify a triple. Only literal objects are ever collapsed.
pub fn classify(triple: &Triple) -> TripleRole {
    if !triple.object.is_literal() || matches!(triple.subject, Term::Literal { .. }) {
        return TripleRole::Statement;
    }
    let p = triple.predicate.as_str();
    if LABEL_PREDICATES.contains(&p) {
        TripleRole::Label
    } else if DESCRIPTION_PREDICATES.contains(&p) {
        TripleRole::Description
    } else if let Some(key) = exprop_key(p) {
        TripleRole::Property(key)
    } else {
        TripleRole::Statement
    }
}

/// Property key for an `exprop:` predicate: local part percent-decoded,
/// underscores read back as spaces.
pub fn exprop_key(predicate: &str) -> Option<SmolStr> {
    let local = predicate.strip_prefix(EXPROP)?;
    if local.is_empty() {
        return None;
    }
    Some(SmolStr::new(percent_decode(local).replace('_', " ")))
}

/// Slug a property key into an `exprop:` local name: whitespace runs become
/// `_`, everything outside the IRI-safe set is percent-encoded.
pub fn slug(key: &str) -> String {
    let joined = key.split_whitespace().collect::<Vec<_>>().join("_");
    urlencoding::encode(&joined).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit_triple(p: &str) -> Triple {
        Triple::new(Term::iri("http://ex.org/a"), p, Term::literal("x"))
    }

    #[test]
    fn classify_annotations() {
        assert_eq!(classify(&lit_triple(RDFS_LABEL)), TripleRole::Label);
        assert_eq!(
            classify(&lit_triple("http://xmlns.com/foaf/0.1/name")),
            TripleRole::Label
        );
        assert_eq!(
            classify(&lit_triple("http://purl.org/dc/terms/description")),
            TripleRole::Description
        );
        assert_eq!(
            classify(&lit_triple("http://example.org/prop/birth_place")),
            TripleRole::Property(SmolStr::new("birth place"))
        );
        assert_eq!(
            classify(&lit_triple("http://ex.org/age")),
            TripleRole::Statement
        );
    }

    #[test]
    fn label_predicate_with_iri_object_is_a_statement() {
        let t = Triple::new(
            Term::iri("http://ex.org/a"),
            RDFS_LABEL,
            Term::iri("http://ex.org/b"),
        );
        assert_eq!(classify(&t), TripleRole::Statement);
    }

    #[test]
    fn slug_and_key_are_inverse_for_spaced_keys() {
        let s = slug("first  name");
        assert_eq!(s, "first_name");
        let p = format!("{EXPROP}{s}");
        assert_eq!(exprop_key(&p).unwrap(), "first name");

        let s = slug("a/b");
        assert_eq!(s, "a%2Fb");
        assert_eq!(exprop_key(&format!("{EXPROP}{s}")).unwrap(), "a/b");
    }

    #[test]
    fn bare_namespace_is_not_a_property() {
        assert_eq!(exprop_key(EXPROP), None);
    }
}
