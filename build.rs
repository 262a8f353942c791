use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

fn collect_rs_files(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_rs_files(&path, out)?;
        } else if path.extension().and_then(|ext| ext.to_str()) == Some("rs") {
            out.push(path);
        }
    }
    Ok(())
}

fn is_env_key_char(byte: u8) -> bool {
    byte.is_ascii_uppercase() || byte.is_ascii_digit() || byte == b'_'
}

fn collect_verskeep_env_keys(source: &str, out: &mut BTreeSet<String>) {
    let bytes = source.as_bytes();
    let needle = b"VERSKEEP_";
    let mut i = 0usize;
    while i + needle.len() <= bytes.len() {
        if &bytes[i..i + needle.len()] == needle {
            let mut j = i + needle.len();
            while j < bytes.len() && is_env_key_char(bytes[j]) {
                j += 1;
            }
            if j > i + needle.len() {
                if let Some(raw) = source.get(i..j) {
                    out.insert(raw.to_string());
                }
                i = j;
                continue;
            }
        }
        i += 1;
    }
}

fn write_generated_allowlist() -> std::io::Result<()> {
    let mut rs_files = Vec::new();
    collect_rs_files(Path::new("src"), &mut rs_files)?;

    let mut keys = BTreeSet::new();
    for file in rs_files {
        if let Ok(content) = fs::read_to_string(&file) {
            collect_verskeep_env_keys(&content, &mut keys);
        }
    }

    // Matched by the scanner but not environment variables: the logfmt
    // warning tag and the generated constant's own name.
    keys.remove("VERSKEEP_WARN");
    keys.remove("VERSKEEP_ENV_ALLOWLIST");

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
    let generated = Path::new(&out_dir).join("verskeep_env_allowlist.rs");
    let mut f = fs::File::create(generated)?;
    writeln!(f, "pub const GENERATED_VERSKEEP_ENV_ALLOWLIST: &[&str] = &[")?;
    for key in keys {
        writeln!(f, "    \"{key}\",")?;
    }
    writeln!(f, "];")?;
    Ok(())
}

fn main() {
    write_generated_allowlist().expect("failed to generate VERSKEEP env allowlist");

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=src");
}
