/// Header normalization and output format lookup.
pub mod negotiate;
