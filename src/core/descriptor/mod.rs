pub mod document;
pub mod model;

pub use document::decode_text;
pub use model::{
    AppletDesc, ApplicationDesc, ArtifactKind, ArtifactRef, Descriptor, Information,
    LaunchTarget, Param, PrivateRuntime, ResourceGroup, RuntimeHint, RuntimeHints,
};
