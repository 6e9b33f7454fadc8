//! Integration tests for the shared device.

use std::thread;

use chardev::{Device, DeviceConfig, ReadExtent, ReadMode};

fn read_all(dev: &Device, chunk: usize) -> Vec<u8> {
    let mut session = dev.open();
    let mut out = Vec::new();
    let mut buf = vec![0u8; chunk];
    loop {
        let n = dev.read(&mut session, &mut buf).unwrap();
        if n == 0 {
            break;
        }
        out.extend_from_slice(&buf[..n]);
    }
    assert_eq!(dev.read(&mut session, &mut buf).unwrap(), 0);
    dev.close(session).unwrap();
    out
}

#[test]
fn test_round_trip_fresh_session() {
    let dev = Device::new(DeviceConfig::default().with_read_extent(ReadExtent::Written)).unwrap();
    let writer = dev.open();
    assert_eq!(dev.write(&writer, b"first ", 0).unwrap(), 6);
    assert_eq!(dev.write(&writer, b"second", 0).unwrap(), 6);
    dev.close(writer).unwrap();

    assert_eq!(read_all(&dev, 4), b"first second");
    // a second fresh session sees the same bytes
    assert_eq!(read_all(&dev, 1024), b"first second");
}

#[test]
fn test_read_exhaustion_at_capacity() {
    for mode in [ReadMode::Requested, ReadMode::Remainder] {
        let dev = Device::new(
            DeviceConfig::default()
                .with_capacity(64)
                .with_read_mode(mode),
        )
        .unwrap();
        let writer = dev.open();
        dev.write(&writer, b"abc", 0).unwrap();

        let mut session = dev.open();
        let mut buf = [0u8; 10];
        let mut total = 0;
        loop {
            let n = dev.read(&mut session, &mut buf).unwrap();
            if n == 0 {
                break;
            }
            total += n;
        }
        assert_eq!(total, 64);
        assert_eq!(session.read_offset(), 64);
    }
}

#[test]
fn test_capacity_bound_over_many_writes() {
    let dev = Device::new(DeviceConfig::default()).unwrap();
    let session = dev.open();
    let mut total = 0;
    for i in 0..200 {
        let data = vec![i as u8; 7];
        total += dev.write(&session, &data, 0).unwrap();
        assert!(dev.write_cursor() <= dev.capacity());
    }
    assert_eq!(total, 1024);
    assert_eq!(dev.write_cursor(), 1024);
}

#[test]
fn test_full_device_then_extra_write() {
    let dev = Device::new(DeviceConfig::default()).unwrap();
    let session = dev.open();
    for _ in 0..1024 {
        assert_eq!(dev.write(&session, b"z", 0).unwrap(), 1);
    }
    assert_eq!(dev.write(&session, b"z", 0).unwrap(), 0);

    // reopening does not reset anything
    dev.close(session).unwrap();
    let session = dev.open();
    assert_eq!(dev.write(&session, b"z", 0).unwrap(), 0);
    dev.close(session).unwrap();
}

#[test]
fn test_accounting_independent_of_io() {
    let dev = Device::new(DeviceConfig::default().with_capacity(32)).unwrap();
    let mut sessions = Vec::new();
    for _ in 0..5 {
        sessions.push(dev.open());
    }
    for s in sessions.iter_mut() {
        dev.write(s, b"data", 0).unwrap();
        let mut buf = [0u8; 8];
        dev.read(s, &mut buf).unwrap();
    }
    for s in sessions.drain(..3) {
        dev.close(s).unwrap();
    }

    let acct = dev.accounting();
    assert_eq!(acct.opens(), 5);
    assert_eq!(acct.closes(), 3);
}

#[test]
fn test_concurrent_writers_respect_capacity() {
    let dev = Device::new(DeviceConfig::default()).unwrap();

    let handles: Vec<_> = (0..8u8)
        .map(|id| {
            let dev = dev.clone();
            thread::spawn(move || {
                let session = dev.open();
                let mut written = 0;
                loop {
                    let n = dev.write(&session, &[id; 13], 0).unwrap();
                    if n == 0 {
                        break;
                    }
                    written += n;
                }
                dev.close(session).unwrap();
                (id, written)
            })
        })
        .collect();

    let results: Vec<(u8, usize)> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let total: usize = results.iter().map(|(_, n)| n).sum();
    assert_eq!(total, 1024);
    assert_eq!(dev.write_cursor(), 1024);

    // every byte a writer was credited with is present in the buffer
    let contents = dev.contents();
    for (id, written) in results {
        let present = contents.iter().filter(|&&b| b == id).count();
        assert_eq!(present, written);
    }

    let stats = dev.stats();
    assert_eq!(stats.open_count, 8);
    assert_eq!(stats.close_count, 8);
    assert_eq!(stats.live_sessions, 0);
}

#[test]
fn test_concurrent_readers_own_their_offsets() {
    let dev = Device::new(DeviceConfig::default().with_read_extent(ReadExtent::Written)).unwrap();
    let writer = dev.open();
    let payload: Vec<u8> = (0..=255u8).collect();
    dev.write(&writer, &payload, 0).unwrap();
    dev.close(writer).unwrap();

    let handles: Vec<_> = (1..=4usize)
        .map(|chunk| {
            let dev = dev.clone();
            thread::spawn(move || read_all(&dev, chunk * 7))
        })
        .collect();

    for h in handles {
        assert_eq!(h.join().unwrap(), payload);
    }
}
