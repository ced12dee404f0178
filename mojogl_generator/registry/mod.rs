////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2020 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

//! The typed registry model.
//!
//! A [`Registry`] is built once from a [`Document`] for one [`Api`] and is never mutated
//!  afterwards. Every generation request borrows it and produces a [`ResolvedApi`].

use std::{collections::HashMap, fmt, path::Path, str::FromStr};

use crate::{error::Location, types::HostType, Result};

mod parse;
mod select;
pub mod xml;

pub use self::select::ResolvedApi;
pub use self::xml::Document;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Api {
    Gl,
    Gles1,
    Gles2,
    Glsc2,
}

impl Api {
    pub fn as_str(self) -> &'static str {
        match self {
            Api::Gl => "gl",
            Api::Gles1 => "gles1",
            Api::Gles2 => "gles2",
            Api::Glsc2 => "glsc2",
        }
    }

    /// Tests an extension's `supported` attribute, e.g. `gl|glcore|gles2`.
    pub fn is_supported_by(self, supported: &str) -> bool {
        supported.split('|').any(|s| s == self.as_str() || (self == Api::Gl && s == "glcore"))
    }
}

impl fmt::Display for Api {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.write_str(self.as_str())
    }
}

impl FromStr for Api {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Api, String> {
        match s {
            "gl" => Ok(Api::Gl),
            "gles1" => Ok(Api::Gles1),
            "gles2" => Ok(Api::Gles2),
            "glsc2" => Ok(Api::Glsc2),
            _ => Err(format!("unknown api `{}` (expected gl, gles1, gles2 or glsc2)", s)),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum Profile {
    #[default]
    Core,
    Compatibility,
}

impl Profile {
    pub fn as_str(self) -> &'static str {
        match self {
            Profile::Core => "core",
            Profile::Compatibility => "compatibility",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.write_str(self.as_str())
    }
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Profile, String> {
        match s {
            "core" => Ok(Profile::Core),
            "compatibility" | "compat" => Ok(Profile::Compatibility),
            _ => Err(format!("unknown profile `{}` (expected core or compatibility)", s)),
        }
    }
}

/// A dotted `major.minor` feature number.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
}

impl Version {
    pub fn new(major: u32, minor: u32) -> Version {
        Version { major, minor }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for Version {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Version, String> {
        let bad = || format!("`{}` is not a dotted version number", s);
        let (major, minor) = s.trim().split_once('.').ok_or_else(bad)?;
        Ok(Version {
            major: major.parse().map_err(|_| bad())?,
            minor: minor.parse().map_err(|_| bad())?,
        })
    }
}

/// A `<type>` entry.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TypeDef {
    pub name: String,
    /// The native declaration, whitespace collapsed. Documentation only; empty for types that
    ///  were referenced but never declared.
    pub declaration: String,
    pub host: HostType,
    pub location: Location,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum EnumValue {
    Signed(i64),
    Unsigned(u64),
}

impl FromStr for EnumValue {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<EnumValue, String> {
        let s = s.trim();
        let bad = |_| format!("`{}` is not an integer literal", s);
        if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            u64::from_str_radix(hex, 16).map(EnumValue::Unsigned).map_err(bad)
        } else if let Some(hex) = s.strip_prefix("-0x").or_else(|| s.strip_prefix("-0X")) {
            let magnitude = i128::from_str_radix(hex, 16).map_err(bad)?;
            i64::try_from(-magnitude).map(EnumValue::Signed).map_err(|_| format!("`{}` does not fit 64 bits", s))
        } else if s.starts_with('-') {
            s.parse::<i64>().map(EnumValue::Signed).map_err(bad)
        } else {
            s.parse::<u64>().map(EnumValue::Unsigned).map_err(bad)
        }
    }
}

/// An `<enum>` constant.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct EnumConstant {
    pub name: String,
    pub value: EnumValue,
    pub groups: Vec<String>,
    pub alias: Option<String>,
    pub location: Location,
}

/// A type as written in a `<proto>` or `<param>`.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct TypeRef {
    /// A registered type name (`GLuint`) or a raw C type (`void`, `unsigned int`).
    pub name: String,
    pub pointer_depth: usize,
    pub is_const: bool,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Param {
    pub name: String,
    pub ty: TypeRef,
    pub group: Option<String>,
    pub len: Option<String>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Command {
    pub name: String,
    pub return_type: TypeRef,
    /// Call-signature order.
    pub params: Vec<Param>,
    pub alias: Option<String>,
    pub introduced_in: Vec<Version>,
    pub removed_in: Vec<Version>,
    pub extensions: Vec<String>,
    pub location: Location,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Action {
    Require,
    Remove,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum TargetKind {
    Command,
    Enum,
    Type,
}

impl fmt::Display for TargetKind {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.write_str(match self {
            TargetKind::Command => "command",
            TargetKind::Enum => "enum",
            TargetKind::Type => "type",
        })
    }
}

/// One `<command name>`, `<enum name>` or `<type name>` inside a `<require>`/`<remove>` block.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Rule {
    pub action: Action,
    pub kind: TargetKind,
    pub name: String,
    /// Set when the enclosing block is restricted to one profile.
    pub profile: Option<Profile>,
    pub location: Location,
}

impl Rule {
    pub fn applies_to(&self, profile: Profile) -> bool {
        self.profile.map_or(true, |p| p == profile)
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Feature {
    pub name: String,
    pub version: Version,
    /// Document order.
    pub rules: Vec<Rule>,
    pub location: Location,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Extension {
    pub name: String,
    pub rules: Vec<Rule>,
    pub location: Location,
}

/// The version-agnostic model of one api in a registry document.
#[derive(Clone, Debug)]
pub struct Registry {
    pub source_name: String,
    pub api: Api,
    /// Declaration order, followed by undeclared types in order of first use.
    pub types: Vec<TypeDef>,
    pub enums: Vec<EnumConstant>,
    pub commands: Vec<Command>,
    /// Ascending by version.
    pub features: Vec<Feature>,
    pub extensions: Vec<Extension>,
    type_index: HashMap<String, usize>,
    enum_index: HashMap<String, usize>,
    command_index: HashMap<String, usize>,
    extension_index: HashMap<String, usize>,
}

impl Registry {
    pub(crate) fn new(
        source_name: String,
        api: Api,
        types: Vec<TypeDef>,
        enums: Vec<EnumConstant>,
        commands: Vec<Command>,
        features: Vec<Feature>,
        extensions: Vec<Extension>,
    ) -> Registry {
        fn index<T>(items: &[T], name: impl Fn(&T) -> &str) -> HashMap<String, usize> {
            items.iter().enumerate().map(|(i, item)| (name(item).to_owned(), i)).collect()
        }

        Registry {
            type_index: index(&types, |t| &t.name),
            enum_index: index(&enums, |e| &e.name),
            command_index: index(&commands, |c| &c.name),
            extension_index: index(&extensions, |e| &e.name),
            source_name,
            api,
            types,
            enums,
            commands,
            features,
            extensions,
        }
    }

    pub fn from_document(doc: &Document, api: Api) -> Result<Registry> {
        parse::extract(doc, api)
    }

    pub fn from_path<P: AsRef<Path>>(path: P, api: Api) -> Result<Registry> {
        Registry::from_document(&Document::from_path(path)?, api)
    }

    pub fn from_str(source_name: impl Into<String>, text: &str, api: Api) -> Result<Registry> {
        Registry::from_document(&Document::from_str(source_name, text)?, api)
    }

    pub fn type_def(&self, name: &str) -> Option<&TypeDef> {
        self.type_index.get(name).map(|&i| &self.types[i])
    }

    pub fn enum_constant(&self, name: &str) -> Option<&EnumConstant> {
        self.enum_index.get(name).map(|&i| &self.enums[i])
    }

    pub fn command(&self, name: &str) -> Option<&Command> {
        self.command_index.get(name).map(|&i| &self.commands[i])
    }

    pub fn extension(&self, name: &str) -> Option<&Extension> {
        self.extension_index.get(name).map(|&i| &self.extensions[i])
    }

    pub fn versions(&self) -> Vec<Version> {
        self.features.iter().map(|f| f.version).collect()
    }

    pub fn latest_version(&self) -> Option<Version> {
        self.features.last().map(|f| f.version)
    }

    /// Extension names, sorted.
    pub fn extension_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.extensions.iter().map(|e| e.name.as_str()).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versions_order_numerically() {
        let v = |s: &str| s.parse::<Version>().unwrap();
        assert!(v("1.10") > v("1.5"));
        assert!(v("2.0") > v("1.10"));
        assert_eq!(v("4.6"), Version::new(4, 6));
        assert_eq!(v("4.6").to_string(), "4.6");
        assert!("4".parse::<Version>().is_err());
        assert!("four.six".parse::<Version>().is_err());
    }

    #[test]
    fn enum_values_keep_sign_and_width() {
        let v = |s: &str| s.parse::<EnumValue>().unwrap();
        assert_eq!(v("0x01"), EnumValue::Unsigned(1));
        assert_eq!(v("0x00004000"), EnumValue::Unsigned(0x4000));
        assert_eq!(v("0xFFFFFFFFFFFFFFFF"), EnumValue::Unsigned(u64::MAX));
        assert_eq!(v("42"), EnumValue::Unsigned(42));
        assert_eq!(v("-1"), EnumValue::Signed(-1));
        assert_eq!(v("-0x10"), EnumValue::Signed(-16));
        assert!("((GLint)-1)".parse::<EnumValue>().is_err());
    }

    #[test]
    fn api_support_patterns() {
        assert!(Api::Gl.is_supported_by("gl|glcore|gles2"));
        assert!(Api::Gl.is_supported_by("glcore"));
        assert!(Api::Gles2.is_supported_by("gl|gles2"));
        assert!(!Api::Gles1.is_supported_by("gl|glcore|gles2"));
    }

    #[test]
    fn profile_names() {
        assert_eq!("core".parse::<Profile>(), Ok(Profile::Core));
        assert_eq!("compatibility".parse::<Profile>(), Ok(Profile::Compatibility));
        assert!("legacy".parse::<Profile>().is_err());
    }
}
