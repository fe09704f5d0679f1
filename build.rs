fn main() {
    println!("cargo:rerun-if-env-changed=COOPDASH_DETECTION_URL");
    println!("cargo:rerun-if-env-changed=COOPDASH_ENVIRONMENT_URL");
    println!("cargo:rerun-if-env-changed=COOPDASH_WIFI_SSID");
    println!("cargo:rerun-if-env-changed=COOPDASH_WIFI_PASSWORD");

    // ESP-IDF link arguments are only needed for the firmware build.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
