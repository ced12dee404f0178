////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2020 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

use std::io;

use super::{Artifact, FormatOptions, FunctionStyle};
use crate::registry::ResolvedApi;

/// Writes Mojo bindings: type aliases, constants, function pointers, a loader and a package file.
#[derive(Copy, Clone, Debug, Default)]
pub struct MojoGenerator {
    pub options: FormatOptions,
}

impl MojoGenerator {
    pub fn new(options: FormatOptions) -> MojoGenerator {
        MojoGenerator { options }
    }
}

impl super::Generator for MojoGenerator {
    fn file_name(&self, artifact: Artifact, api: &ResolvedApi) -> String {
        match artifact {
            Artifact::Types => "gl_types.mojo".to_owned(),
            Artifact::Constants => "gl_enums.mojo".to_owned(),
            Artifact::Functions => format!("gl_{}.mojo", super::gen_module_suffix(api)),
            Artifact::Loader => "gl_loader.mojo".to_owned(),
            Artifact::Package => "__init__.mojo".to_owned(),
        }
    }

    fn write<W>(&self, artifact: Artifact, api: &ResolvedApi, dest: &mut W) -> io::Result<()>
    where W: io::Write {
        write_header(artifact, api, &self.options, dest)?;
        match artifact {
            Artifact::Types => write_type_aliases(api, dest),
            Artifact::Constants => write_enums(api, dest),
            Artifact::Functions => match self.options.function_style {
                FunctionStyle::GlobalSymbols => write_fn_vars(api, dest),
                FunctionStyle::NamespacedStruct => write_fn_struct(api, dest),
            },
            Artifact::Loader => write_loader(api, &self.options, dest),
            Artifact::Package => write_package(api, dest),
        }
    }
}

/// Writes the generated-file marker, the request line and, if enabled, a short description.
fn write_header<W>(artifact: Artifact, api: &ResolvedApi, options: &FormatOptions, dest: &mut W) -> io::Result<()>
where W: io::Write {
    writeln!(dest, "# AUTOGENERATED. DO NOT EDIT.")?;
    writeln!(dest, "# @generated by {} {}", super::GENERATOR_NAME, env!("CARGO_PKG_VERSION"))?;
    writeln!(dest, "{}", super::gen_request_line(api, options))?;

    if options.header_comment {
        let target = format!("OpenGL {} {}", api.version, api.profile);
        let description = match artifact {
            Artifact::Types => format!("{} type aliases ({} types)", target, api.types.len()),
            Artifact::Constants => format!("{} constants ({} constants)", target, api.enums.len()),
            Artifact::Functions => format!("{} function pointers ({} functions)", target, api.commands.len()),
            Artifact::Loader => format!("Loads the {} {} function pointers from a shared library", api.commands.len(), target),
            Artifact::Package => format!("MojoGL package for {}", target),
        };
        writeln!(dest, "#")?;
        writeln!(dest, "# {}", description)?;
    }

    writeln!(dest)
}

/// One `alias` per type referenced by the resolved commands, preceded by its C declaration.
fn write_type_aliases<W>(api: &ResolvedApi, dest: &mut W) -> io::Result<()>
where W: io::Write {
    for ty in &api.types {
        if !ty.declaration.is_empty() {
            writeln!(dest, "# {}", ty.declaration)?;
        }
        writeln!(dest, "alias {} = {}", ty.name, ty.host)?;
    }

    Ok(())
}

fn write_enums<W>(api: &ResolvedApi, dest: &mut W) -> io::Result<()>
where W: io::Write {
    for enm in &api.enums {
        writeln!(dest, "alias {} = {}", enm.name, super::gen_enum_value(enm.value))?;
    }

    Ok(())
}

/// One module-level function pointer per command.
fn write_fn_vars<W>(api: &ResolvedApi, dest: &mut W) -> io::Result<()>
where W: io::Write {
    writeln!(dest, "from .gl_types import *")?;

    if !api.commands.is_empty() {
        writeln!(dest)?;
    }

    for cmd in &api.commands {
        writeln!(dest, "var {}: {}", cmd.name, super::gen_fn_type(cmd))?;
    }

    Ok(())
}

/// A `@value` struct with one field per command, constructed by the loader.
fn write_fn_struct<W>(api: &ResolvedApi, dest: &mut W) -> io::Result<()>
where W: io::Write {
    writeln!(
        dest,
        r#"from .gl_types import *


@value
struct {name}:
    """OpenGL {version} {profile} function pointers."""
"#,
        name = super::gen_struct_name(api),
        version = api.version,
        profile = api.profile,
    )?;

    for cmd in &api.commands {
        writeln!(dest, "    var {}: {}", cmd.name, super::gen_fn_type(cmd))?;
    }

    Ok(())
}

/// Writes `_load_symbol`, `gl_missing_symbols` and the `load_gl_*` entry point.
///
/// `_load_symbol` raises naming the first absent symbol; `gl_missing_symbols` lists all of them
///  so callers can decide whether a partial load is acceptable.
fn write_loader<W>(api: &ResolvedApi, options: &FormatOptions, dest: &mut W) -> io::Result<()>
where W: io::Write {
    let suffix = super::gen_module_suffix(api);

    writeln!(
        dest,
        r#"from sys.ffi import DLHandle
from .gl_types import *
from .gl_{suffix} import *


fn _load_symbol[T: AnyTrivialRegType](lib: DLHandle, name: String) raises -> T:
    if not lib.check_symbol(name):
        raise Error("OpenGL symbol not found: " + name)
    return lib.get_function[T](name)


fn gl_missing_symbols(lib: DLHandle) -> List[String]:
    """Returns every symbol of this binding that `lib` does not export."""
    var missing = List[String]()"#,
        suffix = suffix
    )?;

    for cmd in &api.commands {
        writeln!(
            dest,
            "    if not lib.check_symbol(\"{name}\"):\n        missing.append(\"{name}\")",
            name = cmd.name
        )?;
    }

    writeln!(dest, "    return missing")?;
    writeln!(dest)?;
    writeln!(dest)?;

    let doc = format!(
        "\"\"\"Loads every OpenGL {} {} function pointer from `lib`, raising on the first missing symbol.\"\"\"",
        api.version, api.profile
    );

    match options.function_style {
        FunctionStyle::GlobalSymbols => {
            writeln!(dest, "fn load_gl_{}(lib: DLHandle) raises:", suffix)?;
            writeln!(dest, "    {}", doc)?;
            if api.commands.is_empty() {
                writeln!(dest, "    pass")?;
            }
            for cmd in &api.commands {
                writeln!(
                    dest,
                    "    {name} = _load_symbol[{ty}](lib, \"{name}\")",
                    name = cmd.name,
                    ty = super::gen_fn_type(cmd)
                )?;
            }
        },
        FunctionStyle::NamespacedStruct => {
            let name = super::gen_struct_name(api);
            writeln!(dest, "fn load_gl_{}(lib: DLHandle) raises -> {}:", suffix, name)?;
            writeln!(dest, "    {}", doc)?;
            if api.commands.is_empty() {
                writeln!(dest, "    return {}()", name)?;
            } else {
                writeln!(dest, "    return {}(", name)?;
                for cmd in &api.commands {
                    writeln!(
                        dest,
                        "        _load_symbol[{ty}](lib, \"{name}\"),",
                        name = cmd.name,
                        ty = super::gen_fn_type(cmd)
                    )?;
                }
                writeln!(dest, "    )")?;
            }
        },
    }

    Ok(())
}

fn write_package<W>(api: &ResolvedApi, dest: &mut W) -> io::Result<()>
where W: io::Write {
    writeln!(
        dest,
        "from .gl_types import *
from .gl_enums import *
from .gl_{} import *
from .gl_loader import *",
        super::gen_module_suffix(api)
    )
}
