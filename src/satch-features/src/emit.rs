//! Shell- and header-fragment generators, emitting derived artifacts
//! deterministically. One function per artifact, ported line-for-line from
//! `features/generate.c`'s `generate_*` functions, using `std::fs::write`
//! in place of the original's `fopen`/`fprintf`/`fclose` triples.

use std::io::Write;

use crate::closure::Matrix;
use crate::error::GenerateError;
use crate::model::{Feature, Pair};

fn create(dir: &std::path::Path, name: &str) -> Result<std::fs::File, GenerateError> {
    let path = dir.join(name);
    std::fs::File::create(&path).map_err(|_| GenerateError::Unwritable {
        path: path.display().to_string(),
    })
}

fn write_shell_header(f: &mut impl Write) -> std::io::Result<()> {
    writeln!(f, "# Automatically generated by 'satch-generate'.")
}

fn write_c_header(f: &mut impl Write) -> std::io::Result<()> {
    writeln!(f, "// Automatically generated by 'satch-generate'.")
}

/// Everything a generator needs: the feature list, the transitive hull,
/// and the clashing pairs. Matches the globals `generate_*` reads in the
/// original.
pub struct Context<'a> {
    pub features: &'a [Feature],
    pub hull: &'a Matrix,
    pub clashing: &'a [Pair],
    pub invalid: &'a [(usize, usize)],
}

pub fn init_sh(ctx: &Context, dir: &std::path::Path) -> Result<(), GenerateError> {
    let mut f = create(dir, "init.sh")?;
    write_shell_header(&mut f).ok();
    writeln!(f, "\n# Initialize all features to be enabled by default.\n").ok();
    for feature in ctx.features {
        writeln!(f, "{}=yes", feature.name).ok();
    }
    Ok(())
}

pub fn parse_sh(ctx: &Context, dir: &std::path::Path) -> Result<(), GenerateError> {
    let mut f = create(dir, "parse.sh")?;
    write_shell_header(&mut f).ok();
    writeln!(f, "\n# Match options which disable features.\n").ok();
    writeln!(f, "parse () {{").ok();
    writeln!(f, "  res=0").ok();
    writeln!(f, "  case x\"$1\" in").ok();
    for feature in ctx.features {
        writeln!(f, "    x\"{}\") {}=no;;", feature.option, feature.name).ok();
    }
    writeln!(f, "    *) res=1;;").ok();
    writeln!(f, "  esac").ok();
    writeln!(f, "  return $res").ok();
    writeln!(f, "}}").ok();
    Ok(())
}

pub fn usage_sh(ctx: &Context, dir: &std::path::Path) -> Result<(), GenerateError> {
    let mut f = create(dir, "usage.sh")?;
    write_shell_header(&mut f).ok();
    writeln!(f, "\n# Print option usage to disable features.\n").ok();
    writeln!(f, "cat<<EOF").ok();
    let width = ctx.features.iter().map(|f| f.option.len()).max().unwrap_or(0);
    for feature in ctx.features {
        writeln!(f, "{:<width$} {}", feature.option, feature.usage, width = width).ok();
    }
    writeln!(f, "EOF").ok();
    Ok(())
}

pub fn check_sh(ctx: &Context, dir: &std::path::Path) -> Result<(), GenerateError> {
    let mut f = create(dir, "check.sh")?;
    write_shell_header(&mut f).ok();
    writeln!(f, "\n# Check implied disabled features are not disabled.\n").ok();
    for i in 0..ctx.features.len() {
        for j in 0..ctx.features.len() {
            if ctx.hull.get(i, j) {
                writeln!(
                    f,
                    "[ ${} = no -a ${} = no ] && die \"'{}' implies '{}'\"",
                    ctx.features[i].name,
                    ctx.features[j].name,
                    ctx.features[i].option,
                    ctx.features[j].option
                )
                .ok();
            }
        }
    }
    writeln!(f, "\n# Check clashing disabled features.\n").ok();
    for p in ctx.clashing {
        writeln!(
            f,
            "[ ${} = no -a ${} = no ] && die \"can not combine '{}' and '{}'\"",
            ctx.features[p.a].name,
            ctx.features[p.b].name,
            ctx.features[p.a].option,
            ctx.features[p.b].option
        )
        .ok();
    }
    Ok(())
}

pub fn define_sh(ctx: &Context, dir: &std::path::Path) -> Result<(), GenerateError> {
    let mut f = create(dir, "define.sh")?;
    write_shell_header(&mut f).ok();
    writeln!(f, "\n# Compiler definitions to disable features.\n").ok();
    for feature in ctx.features {
        writeln!(
            f,
            "[ ${} = no ] && CFLAGS=\"$CFLAGS -D{}\"",
            feature.name, feature.define
        )
        .ok();
    }
    Ok(())
}

pub fn version_h(ctx: &Context, dir: &std::path::Path) -> Result<(), GenerateError> {
    let mut f = create(dir, "version.h")?;
    write_c_header(&mut f).ok();
    writeln!(f, "\n// Version extension string for disabled features.\n").ok();
    for feature in ctx.features {
        writeln!(f, "#ifdef {}", feature.define).ok();
        writeln!(f, "\"-{}\"", feature.name).ok();
        writeln!(f, "#endif").ok();
    }
    Ok(())
}

pub fn check_h(ctx: &Context, dir: &std::path::Path) -> Result<(), GenerateError> {
    let mut f = create(dir, "check.h")?;
    write_c_header(&mut f).ok();
    writeln!(f, "\n// Check implied disabled features are not disabled.\n").ok();
    for i in 0..ctx.features.len() {
        for j in 0..ctx.features.len() {
            if ctx.hull.get(i, j) {
                writeln!(f, "#if defined({}) && defined({})", ctx.features[i].define, ctx.features[j].define).ok();
                writeln!(
                    f,
                    "#error \"'{}' implies '{}' (the latter should not be defined)\"",
                    ctx.features[i].define, ctx.features[j].define
                )
                .ok();
                writeln!(f, "#endif").ok();
            }
        }
    }
    writeln!(f, "\n// Check clashing disabled features.\n").ok();
    for p in ctx.clashing {
        writeln!(f, "#if defined({}) && defined({})", ctx.features[p.a].define, ctx.features[p.b].define).ok();
        writeln!(
            f,
            "#error \"'{}' and '{}' can not be combined\"",
            ctx.features[p.a].define, ctx.features[p.b].define
        )
        .ok();
        writeln!(f, "#endif").ok();
    }
    Ok(())
}

pub fn init_h(ctx: &Context, dir: &std::path::Path) -> Result<(), GenerateError> {
    let mut f = create(dir, "init.h")?;
    write_c_header(&mut f).ok();
    writeln!(f, "\n// Force implied disabled features to be disabled.\n").ok();
    for i in 0..ctx.features.len() {
        for j in 0..ctx.features.len() {
            if ctx.hull.get(i, j) {
                writeln!(f, "#if defined({}) && !defined({})", ctx.features[i].define, ctx.features[j].define).ok();
                writeln!(f, "#define {}", ctx.features[j].define).ok();
                writeln!(f, "#endif").ok();
            }
        }
    }
    Ok(())
}

pub fn list_h(ctx: &Context, dir: &std::path::Path) -> Result<(), GenerateError> {
    let mut f = create(dir, "list.h")?;
    write_c_header(&mut f).ok();
    writeln!(f, "\n// List of features.\n").ok();
    for feature in ctx.features {
        writeln!(f, "\"{}\",", feature.option).ok();
    }
    Ok(())
}

pub fn invalid_h(ctx: &Context, dir: &std::path::Path) -> Result<(), GenerateError> {
    let mut f = create(dir, "invalid.h")?;
    write_c_header(&mut f).ok();
    writeln!(f, "\n// Pairs of invalid features.\n").ok();
    for &(i, j) in ctx.invalid {
        writeln!(f, "\"{}\", \"{}\",", ctx.features[i].option, ctx.features[j].option).ok();
    }
    Ok(())
}

pub fn diagnose_h(ctx: &Context, dir: &std::path::Path) -> Result<(), GenerateError> {
    let mut f = create(dir, "print.h")?;
    write_c_header(&mut f).ok();
    writeln!(f, "\n// Print compile time diagnostics on disabled features.\n").ok();
    for feature in ctx.features {
        writeln!(f, "#ifdef {}", feature.define).ok();
        writeln!(f, "#pragma message \"#define {}\"", feature.define).ok();
        writeln!(f, "#endif").ok();
    }
    Ok(())
}

/// `only.sh` is deliberately empty in the original (its per-feature loop
/// body is blank) — kept for parity since downstream build scripts may
/// `source` it unconditionally.
pub fn only_sh(_ctx: &Context, dir: &std::path::Path) -> Result<(), GenerateError> {
    let mut f = create(dir, "only.sh")?;
    write_shell_header(&mut f).ok();
    writeln!(f, "\n# Handle '--only-<feature>' options.\n").ok();
    Ok(())
}

pub type GeneratorFn = fn(&Context, &std::path::Path) -> Result<(), GenerateError>;

pub const GENERATORS: &[(&str, GeneratorFn)] = &[
    ("init.sh", init_sh),
    ("only.sh", only_sh),
    ("parse.sh", parse_sh),
    ("usage.sh", usage_sh),
    ("check.sh", check_sh),
    ("define.sh", define_sh),
    ("version.h", version_h),
    ("check.h", check_h),
    ("init.h", init_h),
    ("list.h", list_h),
    ("invalid.h", invalid_h),
    ("print.h", diagnose_h),
];

pub fn find_generator(name: &str) -> Option<GeneratorFn> {
    GENERATORS.iter().find(|(n, _)| *n == name).map(|(_, f)| *f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::closure::direct_implied;

    #[test]
    fn init_sh_lists_every_feature_as_enabled() {
        let features = vec![
            Feature {
                option: "--no-block".into(),
                usage: "disable blocking".into(),
                name: "block".into(),
                define: "NBLOCK".into(),
            },
        ];
        let hull = direct_implied(1, &[]);
        let ctx = Context {
            features: &features,
            hull: &hull,
            clashing: &[],
            invalid: &[],
        };
        let dir = std::env::temp_dir().join(format!("satch-features-emit-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        init_sh(&ctx, &dir).unwrap();
        let content = std::fs::read_to_string(dir.join("init.sh")).unwrap();
        assert!(content.contains("block=yes"));
    }
}
