//! SPDX format handlers (JSON only; tag-value and RDF are not read)

pub mod json;
