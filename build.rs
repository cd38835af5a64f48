use chrono::Utc;

fn main() {
    println!("cargo:rustc-env=APP_BUILD_DATE={}", Utc::now().format("%Y.%m.%d"));
    println!("cargo:rerun-if-changed=build.rs");
}
