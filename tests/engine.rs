mod tests {
    use embassy_time::Duration;
    use myrtio_rf_light::config::LightConfig;
    use myrtio_rf_light::engine::{
        CHANGE_CHANNEL_SIZE, ChangeChannel, LightEngine, LightError, MAX_SUBSCRIBERS, SharedEngine,
    };
    use myrtio_rf_light::resolver::ResolveError;
    use myrtio_rf_light::state::{Field, LightState};
    use myrtio_rf_light::storage::{RamStore, StorageError, Store};
    use myrtio_rf_light::topology::Topology;

    const INSTANT: Option<Duration> = Some(Duration::from_millis(0));

    struct FailingStore;

    impl Store<LightState> for FailingStore {
        fn load(&mut self) -> Result<Option<LightState>, StorageError> {
            Err(StorageError::Unavailable)
        }

        fn save(&mut self, _value: &LightState) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }
    }

    fn settle<S: Store<LightState>, const N: usize>(engine: &mut LightEngine<'_, S, N>) {
        engine.advance(Duration::from_millis(10_000));
    }

    #[test]
    fn test_startup_defaults() {
        let mut engine = LightEngine::<_, 2>::new(LightConfig::BEDSIDE_LAMP, RamStore::new());
        assert!(engine.power());
        assert_eq!(engine.brightness(), 256);
        assert_eq!(engine.color(), 0);
        assert_eq!(engine.targets(), &[0, 256]);

        // initial targets fade in
        assert_eq!(engine.duties(), &[0, 0]);
        assert!(engine.is_transitioning());
        engine.advance(Duration::from_millis(500));
        assert_eq!(engine.duties(), &[0, 256]);
    }

    #[test]
    fn test_startup_loads_and_clamps() {
        let stored = LightState {
            power: false,
            brightness: 2000,
            color_mix: 300,
            ..LightState::new()
        };
        let engine =
            LightEngine::<_, 2>::new(LightConfig::BEDSIDE_LAMP, RamStore::with_value(stored));
        assert!(!engine.power());
        assert_eq!(engine.brightness(), 1024);
        assert_eq!(engine.color(), 300);
        assert_eq!(engine.targets(), &[0, 0]);
    }

    #[test]
    fn test_setters_clamp() {
        let mut engine = LightEngine::<_, 2>::new(LightConfig::BEDSIDE_LAMP, RamStore::new());
        engine.set_brightness(5000, INSTANT).unwrap();
        assert_eq!(engine.brightness(), 1024);
        engine.set_color(u16::MAX, INSTANT).unwrap();
        assert_eq!(engine.color(), 1024);

        settle(&mut engine);
        assert_eq!(engine.duties(), &[1024, 0]);
    }

    #[test]
    fn test_color_temperature() {
        let mut engine = LightEngine::<_, 2>::new(LightConfig::BEDSIDE_LAMP, RamStore::new());
        engine.set_color_temperature(250, None).unwrap();
        assert_eq!(engine.color(), 458);
        assert_eq!(engine.color_temperature(), 250);

        engine.set_color_temperature(1000, None).unwrap();
        assert_eq!(engine.color(), 1024);
        assert_eq!(engine.color_temperature(), 370);
    }

    #[test]
    fn test_every_mutation_persists() {
        let mut store = RamStore::<LightState>::new();
        let mut engine = LightEngine::<_, 2>::new(LightConfig::BEDSIDE_LAMP, &mut store);
        engine.set_brightness(700, None).unwrap();
        engine.set_power(false, None).unwrap();
        drop(engine);

        assert_eq!(store.saves(), 2);
        let saved = store.value().unwrap();
        assert!(!saved.power);
        assert_eq!(saved.brightness, 700);
    }

    #[test]
    fn test_storage_failure_keeps_memory_state() {
        let mut engine = LightEngine::<_, 2>::new(LightConfig::BEDSIDE_LAMP, FailingStore);
        assert_eq!(engine.brightness(), 256);
        engine.set_brightness(900, INSTANT).unwrap();
        assert_eq!(engine.brightness(), 900);
        assert_eq!(engine.targets(), &[0, 900]);
    }

    #[test]
    fn test_resolve_failure_rolls_back() {
        let mut store = RamStore::<LightState>::new();
        let config = LightConfig::new(Topology::Rgbww);
        let mut engine = LightEngine::<_, 2>::new(config, &mut store);

        let result = engine.set_brightness(900, None);
        assert_eq!(
            result,
            Err(LightError::Resolve(ResolveError::UnsupportedTopology {
                topology: Topology::Rgbww,
                channels: 2
            }))
        );
        assert_eq!(engine.brightness(), 256);
        assert_eq!(engine.targets(), &[0, 0]);
        assert!(engine.set_rgb(1, 2, 3, None).is_err());
        assert_eq!(engine.red(), 0);
        drop(engine);

        assert_eq!(store.saves(), 0);
    }

    #[test]
    fn test_brightness_steps() {
        let config = LightConfig::BEDSIDE_LAMP;
        let mut engine = LightEngine::<_, 2>::new(config, RamStore::new());

        engine.increase_brightness().unwrap();
        assert_eq!(engine.brightness(), 256 + config.brightness_step);

        engine.set_brightness(1000, None).unwrap();
        engine.increase_brightness().unwrap();
        assert_eq!(engine.brightness(), 1024);

        engine.set_brightness(10, None).unwrap();
        engine.decrease_brightness().unwrap();
        assert_eq!(engine.brightness(), config.min_brightness);
    }

    #[test]
    fn test_floor_above_max_never_exceeds_max() {
        let config = LightConfig::new(Topology::Single)
            .with_max_value(255)
            .with_min_brightness(300);
        assert!(config.validate().is_err());

        let mut engine = LightEngine::<_, 1>::new(config, RamStore::new());
        engine.set_brightness(10, None).unwrap();
        engine.decrease_brightness().unwrap();
        assert_eq!(engine.brightness(), 255);
        assert_eq!(engine.targets(), &[255]);
    }

    #[test]
    fn test_brightness_steps_ignored_while_off() {
        let mut store = RamStore::<LightState>::new();
        let mut engine = LightEngine::<_, 2>::new(LightConfig::BEDSIDE_LAMP, &mut store);
        engine.set_power(false, None).unwrap();

        engine.increase_brightness().unwrap();
        engine.decrease(Field::Brightness).unwrap();
        assert!(!engine.power());
        assert_eq!(engine.brightness(), 256);

        // other fields still step
        engine.increase_color().unwrap();
        assert_eq!(engine.color(), 64);
        drop(engine);

        assert_eq!(store.saves(), 2);
    }

    #[test]
    fn test_color_steps_floor_at_zero() {
        let mut engine = LightEngine::<_, 2>::new(LightConfig::BEDSIDE_LAMP, RamStore::new());
        engine.decrease_color().unwrap();
        assert_eq!(engine.color(), 0);

        engine.set_color(1000, None).unwrap();
        engine.increase(Field::ColorMix).unwrap();
        assert_eq!(engine.color(), 1024);
    }

    #[test]
    fn test_toggle_power() {
        let mut engine =
            LightEngine::<_, 1>::new(LightConfig::new(Topology::Single), RamStore::new());
        assert_eq!(engine.toggle_power(INSTANT), Ok(false));
        settle(&mut engine);
        assert_eq!(engine.duties(), &[0]);

        assert_eq!(engine.toggle_power(INSTANT), Ok(true));
        settle(&mut engine);
        assert_eq!(engine.duties(), &[256]);
    }

    #[test]
    fn test_composite_setters() {
        let config = LightConfig::new(Topology::Rgbww).with_max_value(65535);
        let mut engine = LightEngine::<_, 5>::new(config, RamStore::new());
        engine.set_brightness(65535, None).unwrap();
        engine.set_rgbww(10, 20, 30, 40, 50, None).unwrap();
        assert_eq!(engine.targets(), &[10, 20, 30, 40, 50]);

        engine.set_rgbw(1, 2, 3, 4, None).unwrap();
        assert_eq!(engine.targets(), &[1, 2, 3, 4, 50]);

        engine.set_cold_white(7, None).unwrap();
        engine.set_green(9, None).unwrap();
        assert_eq!(engine.targets(), &[1, 9, 3, 4, 7]);
    }

    #[test]
    fn test_notifications() {
        let changes = ChangeChannel::new();
        let mut engine = LightEngine::<_, 2>::new(LightConfig::BEDSIDE_LAMP, RamStore::new());
        engine.subscribe(changes.sender()).unwrap();

        engine.set_brightness(300, None).unwrap();
        let targets = *engine.targets();
        engine.set_brightness(300, None).unwrap();
        assert_eq!(engine.targets(), &targets);

        let receiver = changes.receiver();
        let first = receiver.try_receive().unwrap();
        let second = receiver.try_receive().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.state.brightness, 300);
        assert!(receiver.try_receive().is_err());
    }

    #[test]
    fn test_full_subscriber_queue_does_not_fail_setter() {
        let changes = ChangeChannel::new();
        let mut engine = LightEngine::<_, 2>::new(LightConfig::BEDSIDE_LAMP, RamStore::new());
        engine.subscribe(changes.sender()).unwrap();

        for brightness in 0..10 {
            engine.set_brightness(brightness, None).unwrap();
        }
        assert_eq!(changes.len(), CHANGE_CHANNEL_SIZE);
        assert_eq!(engine.brightness(), 9);
    }

    #[test]
    fn test_multiple_subscribers() {
        let channels: [ChangeChannel; MAX_SUBSCRIBERS + 1] = Default::default();
        let mut engine = LightEngine::<_, 2>::new(LightConfig::BEDSIDE_LAMP, RamStore::new());
        for channel in &channels[..MAX_SUBSCRIBERS] {
            engine.subscribe(channel.sender()).unwrap();
        }
        assert_eq!(
            engine.subscribe(channels[MAX_SUBSCRIBERS].sender()),
            Err(LightError::TooManySubscribers)
        );

        engine.set_power(false, None).unwrap();
        for channel in &channels[..MAX_SUBSCRIBERS] {
            assert!(!channel.try_receive().unwrap().state.power);
        }
        assert!(channels[MAX_SUBSCRIBERS].is_empty());
    }

    #[test]
    fn test_shared_engine() {
        let engine = LightEngine::<_, 2>::new(LightConfig::BEDSIDE_LAMP, RamStore::new());
        let shared = SharedEngine::new(engine);

        shared.lock(|engine| engine.set_brightness(512, None)).unwrap();
        assert_eq!(shared.lock(|engine| engine.brightness()), 512);

        let engine = shared.into_inner();
        assert_eq!(engine.brightness(), 512);
    }
}
