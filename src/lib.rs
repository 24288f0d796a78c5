//! Compile declarative Glue configuration into CloudFormation resources.
//!
//! The `custom.Glue` section of a service configuration describes jobs,
//! connections and triggers. [`compiler::compile`] publishes each job script,
//! builds one resource record per entry, synthesizes the shared temp bucket
//! when a job needs it, and returns a [`compiler::CompiledTemplate`] that is
//! written into any [`template::TemplateSink`].
//!
//! # Example
//!
//! ```ignore
//! use gluegen::{compile, CloudFormationTemplate, CompileContext, DryRunPublisher, ServiceConfig};
//!
//! async fn example(config: &ServiceConfig, ctx: &CompileContext) -> anyhow::Result<()> {
//!     let compiled = compile(config.glue()?, ctx, &DryRunPublisher).await?;
//!     let mut template = CloudFormationTemplate::default();
//!     compiled.write_to(&mut template);
//!     Ok(())
//! }
//! ```

pub mod compiler;
pub mod config;
pub mod error;
pub mod naming;
pub mod publish;
pub mod resource;
pub mod template;

pub use compiler::{compile, CompileContext, CompiledTemplate};
pub use config::{GlueConfig, ServiceConfig};
pub use error::{CompileError, PublishError};
pub use publish::{ArtifactPublisher, DryRunPublisher, HttpArtifactPublisher};
pub use template::{CloudFormationTemplate, TemplateSink};
