use std::env;
use std::path::PathBuf;

fn fallback_dotenv_path(keep_home: Option<PathBuf>, home_dir: Option<PathBuf>) -> Option<PathBuf> {
    let base = keep_home.or(home_dir)?;
    Some(base.join(".verskeep/.env"))
}

pub fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    let fallback = fallback_dotenv_path(
        env::var_os("VERSKEEP_HOME").map(PathBuf::from),
        dirs::home_dir(),
    );

    let Some(path) = fallback else {
        return;
    };
    if path.is_file() {
        let _ = dotenvy::from_path(&path);
    }
}
