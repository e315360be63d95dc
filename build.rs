use std::fs;

fn main() {
    // The bundled [paths], [font] and [table] defaults must parse
    let config_path = "src/default_config.toml";
    println!("cargo:rerun-if-changed={}", config_path);

    let content = fs::read_to_string(config_path).expect("Failed to read default_config.toml");

    if let Err(e) = content.parse::<toml::Table>() {
        panic!("src/default_config.toml is not valid TOML ([paths]/[font]/[table] defaults): {}", e);
    }
}
