use std::path::PathBuf;

/// Environment variable overriding the data directory (desktop runs, tests)
pub const DATA_DIR_ENV: &str = "DAILY_MEMENTO_DATA_DIR";

#[cfg(target_os = "android")]
const ANDROID_FALLBACK_DIRS: [&str; 2] = [
    "/data/user/0/de.teilgedanken.dailymemento/files",
    "/data/data/de.teilgedanken.dailymemento/files",
];

#[cfg(target_os = "android")]
fn android_files_dir() -> Option<PathBuf> {
    use jni::{
        objects::{JObject, JString},
        JavaVM,
    };
    unsafe {
        let ctx = ndk_context::android_context();
        let vm = JavaVM::from_raw(ctx.vm().cast()).ok()?;
        let mut env = vm.attach_current_thread().ok()?;
        let activity = JObject::from_raw(ctx.context().cast());
        let files_dir = env
            .call_method(activity, "getFilesDir", "()Ljava/io/File;", &[])
            .ok()?
            .l()
            .ok()?;
        let abs_path = env
            .call_method(files_dir, "getAbsolutePath", "()Ljava/lang/String;", &[])
            .ok()?
            .l()
            .ok()?;
        let abs_path: JString = JString::from(abs_path);
        let abs_path: String = env.get_string(&abs_path).ok()?.into();
        Some(PathBuf::from(abs_path))
    }
}

/// Per-user documents root holding the database, the photos and `config.toml`
pub fn get_app_data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }

    #[cfg(target_os = "android")]
    {
        if let Some(dir) = android_files_dir() {
            return dir;
        }
        for d in ANDROID_FALLBACK_DIRS {
            let p = PathBuf::from(d);
            if p.exists() {
                return p;
            }
        }
        PathBuf::from("./data")
    }

    #[cfg(not(target_os = "android"))]
    {
        PathBuf::from("./data")
    }
}
