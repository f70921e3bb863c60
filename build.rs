fn main() {
    // Propagate the ESP-IDF build environment only when the espidf
    // feature is enabled; host test builds need none of it.
    if std::env::var_os("CARGO_FEATURE_ESPIDF").is_some() {
        embuild::espidf::sysenv::output();
    }
}
