mod tests {
    use myrtio_rf_light::channel::{Channel, TryReceiveError, TrySendError};
    use myrtio_rf_light::radio::{
        AddressError, DEFAULT_RADIO_CHANNEL, EnqueueError, PACKET_QUEUE_SIZE, PacketQueue,
        RadioSettings, enqueue_packet, load_radio_settings, update_radio_settings,
    };
    use myrtio_rf_light::storage::{RamStore, StorageError, Store};

    const MAC: [u8; 6] = [0x24, 0x6F, 0x28, 0xAA, 0xBB, 0xCC];

    struct ReadOnlyStore(RadioSettings);

    impl Store<RadioSettings> for ReadOnlyStore {
        fn load(&mut self) -> Result<Option<RadioSettings>, StorageError> {
            Ok(Some(self.0))
        }

        fn save(&mut self, _value: &RadioSettings) -> Result<(), StorageError> {
            Err(StorageError::Busy)
        }
    }

    #[test]
    fn test_defaults_from_mac() {
        let settings = load_radio_settings(&mut RamStore::new(), MAC);
        assert_eq!(settings.channel, DEFAULT_RADIO_CHANNEL);
        assert_eq!(settings.address, [0x6F, 0x28, 0xAA, 0xBB, 0xCC]);
        assert_eq!(settings.address_string().as_str(), "6F:28:AA:BB:CC");
    }

    #[test]
    fn test_update_persists() {
        let mut store = RamStore::<RadioSettings>::new();
        let settings = update_radio_settings(&mut store, 76, "01:02:0a:FF:10").unwrap();
        assert_eq!(settings.address, [0x01, 0x02, 0x0A, 0xFF, 0x10]);
        assert_eq!(store.value(), Some(&settings));
        assert_eq!(load_radio_settings(&mut store, MAC), settings);
    }

    #[test]
    fn test_update_survives_storage_failure() {
        let mut store = ReadOnlyStore(RadioSettings::from_mac(MAC));
        let settings = update_radio_settings(&mut store, 5, "00:00:00:00:01").unwrap();
        assert_eq!(settings.channel, 5);
    }

    #[test]
    fn test_parse_address_rejects_bad_input() {
        for input in [
            "",
            "01:02:03:04",
            "01:02:03:04:05:06",
            "01:02:03:04:5",
            "01:02:03:04:GG",
            "0102:03:04:05",
        ] {
            assert_eq!(
                RadioSettings::parse_address(input),
                Err(AddressError::Format),
                "{input:?}"
            );
        }
        let mut store = RamStore::<RadioSettings>::new();
        assert!(update_radio_settings(&mut store, 1, "bogus").is_err());
        assert_eq!(store.saves(), 0);
    }

    #[test]
    fn test_packet_queue() {
        let queue = PacketQueue::new();
        let sender = queue.sender();
        assert_eq!(
            enqueue_packet(&sender, &[0; 33]),
            Err(EnqueueError::Oversized(33))
        );
        for index in 0..PACKET_QUEUE_SIZE {
            enqueue_packet(&sender, &[index as u8; 9]).unwrap();
        }
        assert_eq!(enqueue_packet(&sender, &[0; 9]), Err(EnqueueError::QueueFull));

        let receiver = queue.receiver();
        assert_eq!(receiver.try_receive().unwrap().as_slice(), &[0; 9]);
        assert_eq!(receiver.drain().count(), PACKET_QUEUE_SIZE - 1);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_channel_fifo() {
        let channel: Channel<u8, 2> = Channel::new();
        let sender = channel.sender();
        sender.try_send(1).unwrap();
        sender.try_send(2).unwrap();
        assert_eq!(sender.try_send(3), Err(TrySendError(3)));
        assert_eq!(channel.len(), 2);

        let receiver = channel.receiver();
        assert_eq!(receiver.try_receive(), Ok(1));
        assert_eq!(receiver.try_receive(), Ok(2));
        assert_eq!(receiver.try_receive(), Err(TryReceiveError));

        sender.try_send(4).unwrap();
        channel.clear();
        assert!(channel.is_empty());
    }
}
