////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2019 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

//! A Mojo OpenGL bindings generator. It reads the Khronos `gl.xml` registry and writes type
//! aliases, constants, function pointer declarations and a loader for one OpenGL version and
//! profile.
//!
//! # Example
//!
//! ```no_run
//! use mojogl_generator::{generate, Api, Registry, Request};
//!
//! let registry = Registry::from_path("gl.xml", Api::Gl).unwrap();
//! let bindings = generate(&registry, &Request::default()).unwrap();
//!
//! for warning in &bindings.warnings {
//!     eprintln!("warning: {}", warning);
//! }
//! bindings.write_to("mojo/mojogl").unwrap();
//! ```
//!
//! The output directory then holds a Mojo package:
//!
//! - `gl_types.mojo`: `alias` per registry type used by the selected functions
//! - `gl_enums.mojo`: every selected constant
//! - `gl_core_4_6.mojo`: one function pointer per selected command
//! - `gl_loader.mojo`: `load_gl_core_4_6(lib: DLHandle)`, which resolves each symbol and raises
//!   on the first one missing
//! - `__init__.mojo`: re-exports the above
//!
//! Generation is deterministic: identical registry contents and requests produce byte-identical
//!  files.

#[macro_use]
extern crate log;

pub mod error;
pub mod generators;
pub mod pipeline;
pub mod registry;
pub mod types;

pub use crate::error::{Error, ErrorKind, Location, Result, Warning};
pub use crate::generators::{mojo_gen::MojoGenerator, Artifact, FormatOptions, FunctionStyle, Generator};
pub use crate::pipeline::{generate, Bindings, GeneratedFile, Request};
pub use crate::registry::{
    Action, Api, Command, Document, EnumConstant, EnumValue, Extension, Feature, Param, Profile, Registry, ResolvedApi,
    Rule, TargetKind, TypeDef, TypeRef, Version,
};
pub use crate::types::{map_type, HostType};
