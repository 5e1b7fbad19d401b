mod tests {
    use myrtio_rf_light::network::RemoteTelemetry;
    use myrtio_rf_light::registry::{RemoteRegistry, registry_key, uuid_hex};

    #[test]
    fn test_observe_reports_first_sighting() {
        let mut registry = RemoteRegistry::new();
        assert!(registry.is_empty());

        let uuid = [0xDE, 0xAD, 0xBE, 0xEF];
        assert!(registry.observe(uuid, 255, 3000).is_new);
        assert!(!registry.observe(uuid, 128, 2900).is_new);
        assert_eq!(registry.len(), 1);

        let info = registry.get(&uuid).unwrap();
        assert_eq!(info.battery_percentage, 50);
        assert_eq!(info.battery_mv, 2900);
        assert_eq!(info.uuid_hex().as_str(), "DEADBEEF");
    }

    #[test]
    fn test_iter_in_key_order() {
        let mut registry = RemoteRegistry::new();
        registry.observe([0, 1, 0, 0], 10, 1);
        registry.observe([1, 0, 0, 0], 20, 2);
        registry.observe([0, 0, 0, 1], 30, 3);

        let order: Vec<[u8; 4]> = registry.iter().map(|info| info.uuid).collect();
        assert_eq!(order, vec![[1, 0, 0, 0], [0, 1, 0, 0], [0, 0, 0, 1]]);
        assert_eq!(registry_key(&[1, 0, 0, 0]), 1);
        assert_eq!(registry_key(&[0, 1, 0, 0]), 256);
    }

    #[test]
    fn test_uuid_hex_pads() {
        assert_eq!(uuid_hex(&[0x00, 0x0A, 0xB0, 0x01]).as_str(), "000AB001");
    }

    #[test]
    fn test_telemetry_json() {
        let mut registry = RemoteRegistry::new();
        registry.observe([1, 2, 3, 4], 128, 2900);
        let telemetry = RemoteTelemetry::from(registry.get(&[1, 2, 3, 4]).unwrap());
        let json = telemetry.to_json::<64>().unwrap();
        assert_eq!(json.as_str(), r#"{"battery":50,"batteryVoltage":2900}"#);
    }
}
