////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2020 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

//! Translation of registry types into Mojo types.

use std::{collections::HashMap, fmt};

use lazy_static::lazy_static;

/// A Mojo type expression.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum HostType {
    Scalar(&'static str),
    /// `NoneType`, only meaningful as a return type.
    Unit,
    /// `OpaquePointer`, used for `void *`, opaque handles and anything unrecognized.
    Opaque,
    Pointer { pointee: Box<HostType>, immutable: bool },
}

impl fmt::Display for HostType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            HostType::Scalar(name) => f.write_str(name),
            HostType::Unit => f.write_str("NoneType"),
            HostType::Opaque => f.write_str("OpaquePointer"),
            HostType::Pointer { pointee, immutable: false } => write!(f, "UnsafePointer[{}]", pointee),
            HostType::Pointer { pointee, immutable: true } => write!(f, "UnsafePointer[{}, mut=False]", pointee),
        }
    }
}

lazy_static! {
    // registry type (or raw C type) -> host type at pointer depth 0
    static ref BASE_TYPES: HashMap<&'static str, HostType> = {
        use self::HostType::*;

        let mut map = HashMap::new();
        map.insert("void", Unit);
        map.insert("GLvoid", Unit);
        map.insert("GLbyte", Scalar("Int8"));
        map.insert("GLshort", Scalar("Int16"));
        map.insert("GLint", Scalar("Int32"));
        map.insert("GLsizei", Scalar("Int32"));
        map.insert("GLfixed", Scalar("Int32"));
        map.insert("GLclampx", Scalar("Int32"));
        map.insert("GLubyte", Scalar("UInt8"));
        map.insert("GLushort", Scalar("UInt16"));
        map.insert("GLhalf", Scalar("UInt16"));
        map.insert("GLhalfARB", Scalar("UInt16"));
        map.insert("GLhalfNV", Scalar("UInt16"));
        map.insert("GLuint", Scalar("UInt32"));
        map.insert("GLboolean", Scalar("UInt8"));
        map.insert("GLbitfield", Scalar("UInt32"));
        map.insert("GLenum", Scalar("UInt32"));
        map.insert("GLhandleARB", Scalar("UInt32"));
        map.insert("GLfloat", Scalar("Float32"));
        map.insert("GLclampf", Scalar("Float32"));
        map.insert("GLdouble", Scalar("Float64"));
        map.insert("GLclampd", Scalar("Float64"));
        map.insert("GLchar", Scalar("UInt8"));
        map.insert("GLcharARB", Scalar("UInt8"));
        map.insert("GLintptr", Scalar("Int"));
        map.insert("GLintptrARB", Scalar("Int"));
        map.insert("GLsizeiptr", Scalar("Int"));
        map.insert("GLsizeiptrARB", Scalar("Int"));
        map.insert("GLvdpauSurfaceNV", Scalar("Int"));
        map.insert("GLint64", Scalar("Int64"));
        map.insert("GLint64EXT", Scalar("Int64"));
        map.insert("GLuint64", Scalar("UInt64"));
        map.insert("GLuint64EXT", Scalar("UInt64"));
        map.insert("GLsync", Opaque);
        map.insert("GLeglImageOES", Opaque);
        map.insert("GLeglClientBufferEXT", Opaque);
        map.insert("GLDEBUGPROC", Opaque);
        map.insert("GLDEBUGPROCARB", Opaque);
        map.insert("GLDEBUGPROCKHR", Opaque);
        map.insert("GLDEBUGPROCAMD", Opaque);
        map.insert("GLVULKANPROCNV", Opaque);

        // raw C spellings used where a <param> has no <ptype>
        map.insert("char", Scalar("Int8"));
        map.insert("signed char", Scalar("Int8"));
        map.insert("unsigned char", Scalar("UInt8"));
        map.insert("short", Scalar("Int16"));
        map.insert("unsigned short", Scalar("UInt16"));
        map.insert("int", Scalar("Int32"));
        map.insert("unsigned int", Scalar("UInt32"));
        map.insert("float", Scalar("Float32"));
        map.insert("double", Scalar("Float64"));
        map.insert("int8_t", Scalar("Int8"));
        map.insert("uint8_t", Scalar("UInt8"));
        map.insert("int16_t", Scalar("Int16"));
        map.insert("uint16_t", Scalar("UInt16"));
        map.insert("int32_t", Scalar("Int32"));
        map.insert("uint32_t", Scalar("UInt32"));
        map.insert("int64_t", Scalar("Int64"));
        map.insert("uint64_t", Scalar("UInt64"));
        map.insert("ptrdiff_t", Scalar("Int"));
        map.insert("size_t", Scalar("UInt"));
        map
    };
}

/// Host type of `name` at pointer depth 0, or `None` if the name is not recognized.
pub fn base_type(name: &str) -> Option<HostType> {
    BASE_TYPES.get(name).cloned()
}

pub fn is_mapped(name: &str) -> bool {
    BASE_TYPES.contains_key(name)
}

/// Maps a registry type to a host type.
///
/// Every pointer level wraps the base in `UnsafePointer`; `const` marks the innermost level
///  immutable. A pointer to `void` is `OpaquePointer`. Unrecognized names never fail: at depth 0
///  they become `OpaquePointer` and behind pointers they are treated like `void`.
pub fn map_type(name: &str, pointer_depth: usize, is_const: bool) -> HostType {
    let mut ty = match base_type(name) {
        Some(ty) => ty,
        None if pointer_depth == 0 => return HostType::Opaque,
        None => HostType::Unit,
    };

    for level in 0..pointer_depth {
        ty = match ty {
            HostType::Unit => HostType::Opaque,
            pointee => HostType::Pointer {
                pointee: Box::new(pointee),
                immutable: is_const && level == 0,
            },
        };
    }

    ty
}
