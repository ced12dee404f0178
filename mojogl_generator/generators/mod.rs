////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2019 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

use std::{borrow::Cow, fmt, io, str::FromStr};

use crate::{
    registry::{Command, EnumValue, ResolvedApi, TypeRef},
    types,
};

pub mod mojo_gen;

/// How function pointers are exposed in the generated code.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum FunctionStyle {
    /// One module-level `var` per command.
    #[default]
    GlobalSymbols,
    /// One struct holding every command as a field.
    NamespacedStruct,
}

impl FunctionStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            FunctionStyle::GlobalSymbols => "global-symbols",
            FunctionStyle::NamespacedStruct => "namespaced-struct",
        }
    }
}

impl fmt::Display for FunctionStyle {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.write_str(self.as_str())
    }
}

impl FromStr for FunctionStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<FunctionStyle, String> {
        match s {
            "global-symbols" => Ok(FunctionStyle::GlobalSymbols),
            "namespaced-struct" => Ok(FunctionStyle::NamespacedStruct),
            _ => Err(format!("unknown function style `{}` (expected global-symbols or namespaced-struct)", s)),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct FormatOptions {
    pub function_style: FunctionStyle,
    /// Adds a descriptive comment block under the generated-file marker.
    pub header_comment: bool,
}

impl Default for FormatOptions {
    fn default() -> FormatOptions {
        FormatOptions {
            function_style: FunctionStyle::GlobalSymbols,
            header_comment: true,
        }
    }
}

/// The files a generator produces, in writing order.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Artifact {
    Types,
    Constants,
    Functions,
    Loader,
    Package,
}

impl Artifact {
    pub const ALL: [Artifact; 5] = [
        Artifact::Types,
        Artifact::Constants,
        Artifact::Functions,
        Artifact::Loader,
        Artifact::Package,
    ];
}

/// Trait for a bindings generator.
pub trait Generator {
    fn file_name(&self, artifact: Artifact, api: &ResolvedApi) -> String;

    /// Renders one artifact.
    fn write<W>(&self, artifact: Artifact, api: &ResolvedApi, dest: &mut W) -> io::Result<()>
    where W: io::Write;
}

pub const GENERATOR_NAME: &str = "mojogl-generator";

/// `core_4_6`, used in file and loader names.
pub fn gen_module_suffix(api: &ResolvedApi) -> String {
    format!("{}_{}_{}", api.profile, api.version.major, api.version.minor)
}

/// `GLCore46`, the struct name in namespaced-struct style.
pub fn gen_struct_name(api: &ResolvedApi) -> String {
    let profile = match api.profile {
        crate::Profile::Core => "Core",
        crate::Profile::Compatibility => "Compat",
    };
    format!("GL{}{}{}", profile, api.version.major, api.version.minor)
}

/// The request line stamped into every artifact.
pub fn gen_request_line(api: &ResolvedApi, options: &FormatOptions) -> String {
    format!(
        "# request: api={} version={} profile={} extensions=[{}] function-style={}",
        api.registry.api,
        api.version,
        api.profile,
        api.extensions.join(","),
        options.function_style
    )
}

/// Constant values: small values in decimal, everything else as 8-digit hex.
pub fn gen_enum_value(value: EnumValue) -> String {
    match value {
        EnumValue::Signed(v) if v < 0 => v.to_string(),
        EnumValue::Signed(v) => gen_enum_value(EnumValue::Unsigned(v as u64)),
        EnumValue::Unsigned(v) if v <= 9 => v.to_string(),
        EnumValue::Unsigned(v) => format!("0x{:08X}", v),
    }
}

const KEYWORDS: &[&str] = &[
    "alias", "and", "as", "borrowed", "break", "continue", "def", "del", "elif", "else", "except", "False", "finally",
    "fn", "for", "from", "global", "if", "import", "in", "inout", "is", "lambda", "None", "nonlocal", "not", "or", "out",
    "owned", "pass", "raise", "raises", "ref", "return", "self", "struct", "trait", "True", "try", "var", "while", "with",
    "yield",
];

/// Escapes identifiers that collide with Mojo keywords.
pub fn gen_ident(name: &str) -> Cow<'_, str> {
    if KEYWORDS.contains(&name) {
        Cow::Owned(format!("{}_", name))
    } else {
        Cow::Borrowed(name)
    }
}

pub fn gen_host_type(ty: &TypeRef) -> String {
    types::map_type(&ty.name, ty.pointer_depth, ty.is_const).to_string()
}

/// Generates the list of Mojo parameters a `Command` requires.
pub fn gen_parameters(cmd: &Command, with_idents: bool) -> Vec<String> {
    cmd.params
        .iter()
        .map(|param| {
            if with_idents {
                format!("{}: {}", gen_ident(&param.name), gen_host_type(&param.ty))
            } else {
                gen_host_type(&param.ty)
            }
        })
        .collect()
}

/// The Mojo function type of a command, e.g. `fn(mask: UInt32) -> NoneType`.
pub fn gen_fn_type(cmd: &Command) -> String {
    format!("fn({}) -> {}", gen_parameters(cmd, true).join(", "), gen_host_type(&cmd.return_type))
}
