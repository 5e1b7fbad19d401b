mod tests {
    use myrtio_rf_light::config::LightConfig;
    use myrtio_rf_light::engine::LightEngine;
    use myrtio_rf_light::network::{
        CommandError, LightCommand, SnapshotError, StateSnapshot, saturate,
    };
    use myrtio_rf_light::state::LightState;
    use myrtio_rf_light::storage::RamStore;
    use myrtio_rf_light::topology::Topology;

    #[test]
    fn test_parse_command() {
        let command =
            LightCommand::from_json(br#"{"state":"On","brightness":512,"color_temp":300}"#)
                .unwrap();
        assert_eq!(command.power(), Some(Ok(true)));
        assert_eq!(command.brightness, Some(512));
        assert_eq!(command.color_temp, Some(300));
        assert!(!command.has_channels());

        let command = LightCommand::from_json(br#"{"state":"nope"}"#).unwrap();
        assert_eq!(command.power(), Some(Err("nope")));

        let command = LightCommand::from_json(br#"{"cw":7}"#).unwrap();
        assert_eq!(command.power(), None);
        assert!(command.has_channels());

        assert_eq!(
            LightCommand::from_json(b"not json"),
            Err(CommandError::Json)
        );
    }

    #[test]
    fn test_saturate() {
        assert_eq!(saturate(0), 0);
        assert_eq!(saturate(65535), 65535);
        assert_eq!(saturate(70000), u16::MAX);
    }

    #[test]
    fn test_cct_snapshot() {
        let engine = LightEngine::<_, 2>::new(LightConfig::BEDSIDE_LAMP, RamStore::new());
        let json = engine.snapshot().to_json::<256>().unwrap();
        assert_eq!(
            json.as_str(),
            r#"{"mode":"CCT","state":"ON","brightness":256,"color_mode":"color_temp","color_temp":153}"#
        );
    }

    #[test]
    fn test_rgbww_snapshot() {
        let state = LightState {
            power: false,
            brightness: 0,
            color_mix: 0,
            red: 1,
            green: 2,
            blue: 3,
            warm_white: 4,
            cold_white: 5,
        };
        let config = LightConfig::new(Topology::Rgbww);
        let json = StateSnapshot::new(&state, &config).to_json::<256>().unwrap();
        assert_eq!(
            json.as_str(),
            r#"{"mode":"RGBWW","state":"OFF","brightness":0,"red":1,"green":2,"blue":3,"ww":4,"cw":5}"#
        );

        let rgbw = StateSnapshot::new(&state, &LightConfig::new(Topology::Rgbw));
        assert_eq!(rgbw.ww, Some(4));
        assert_eq!(rgbw.cw, None);

        let single = StateSnapshot::new(&state, &LightConfig::new(Topology::Single));
        assert_eq!(single.mode, "SINGLE");
        assert_eq!(single.red, None);
        assert_eq!(single.color_temp, None);
    }

    #[test]
    fn test_snapshot_buffer_too_small() {
        let snapshot = StateSnapshot::new(&LightState::new(), &LightConfig::BEDSIDE_LAMP);
        assert_eq!(snapshot.to_json::<16>(), Err(SnapshotError::BufferTooSmall));
    }
}
