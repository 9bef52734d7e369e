//! Thin wrappers over the raw ADSI COM surface.

pub mod activation;
pub mod collection;
pub mod enumerator;
pub mod guid;
pub mod variant;

pub use activation::create_instance;
pub use collection::AdsCollection;
pub use enumerator::next_element;
pub use variant::{OwnedVariant, variant_to_dispatch, variant_to_strings};
