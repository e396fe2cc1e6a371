use embedded_hal_mock::eh1::delay::NoopDelay;
use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction as PinTransaction};
use tm16xx::{StrobeBus, Transport, TwoWireBus};

fn clock_pulses(count: usize) -> Vec<PinTransaction> {
    let mut pulses = Vec::new();
    for _ in 0..count {
        pulses.push(PinTransaction::set(State::Low));
        pulses.push(PinTransaction::set(State::High));
    }
    pulses
}

fn data_bits(byte: u8) -> Vec<PinTransaction> {
    (0..8)
        .map(|bit| {
            let state = if byte & (1 << bit) != 0 {
                State::High
            } else {
                State::Low
            };
            PinTransaction::set(state)
        })
        .collect()
}

#[test]
fn strobe_bus_command() {
    let mut dio = PinMock::new(&data_bits(0x8F));
    let mut clk = PinMock::new(&clock_pulses(8));
    let mut stb = PinMock::new(&[
        PinTransaction::set(State::Low),
        PinTransaction::set(State::High),
    ]);

    let mut bus = StrobeBus::new(dio.clone(), clk.clone(), stb.clone(), NoopDelay::new(), 1);
    bus.start().unwrap();
    bus.send(0x8F).unwrap();
    bus.stop().unwrap();

    dio.done();
    clk.done();
    stb.done();
}

#[test]
fn strobe_bus_receive_lsb_first() {
    let mut dio_expectations = vec![PinTransaction::set(State::High)];
    for state in [
        State::High,
        State::Low,
        State::Low,
        State::Low,
        State::High,
        State::Low,
        State::Low,
        State::Low,
    ] {
        dio_expectations.push(PinTransaction::get(state));
    }
    let mut dio = PinMock::new(&dio_expectations);
    let mut clk = PinMock::new(&clock_pulses(8));
    let mut stb = PinMock::new(&Vec::<PinTransaction>::new());

    let mut bus = StrobeBus::new(dio.clone(), clk.clone(), stb.clone(), NoopDelay::new(), 1);
    assert_eq!(bus.receive().unwrap(), 0x11);

    dio.done();
    clk.done();
    stb.done();
}

#[test]
fn two_wire_bus_with_ack() {
    let mut dio_expectations = vec![PinTransaction::set(State::Low)]; // start
    dio_expectations.extend(data_bits(0x44));
    dio_expectations.push(PinTransaction::set(State::High)); // release for ack
    dio_expectations.push(PinTransaction::get(State::Low)); // chip acks
    dio_expectations.extend([
        PinTransaction::set(State::Low),
        PinTransaction::set(State::High),
    ]); // stop

    let mut clk_expectations = vec![PinTransaction::set(State::Low)]; // start
    clk_expectations.extend(clock_pulses(8));
    clk_expectations.extend(clock_pulses(1)); // ack cycle
    clk_expectations.push(PinTransaction::set(State::Low));
    clk_expectations.extend(clock_pulses(1)); // stop

    let mut dio = PinMock::new(&dio_expectations);
    let mut clk = PinMock::new(&clk_expectations);

    let mut bus = TwoWireBus::with_ack(dio.clone(), clk.clone(), NoopDelay::new(), 5);
    bus.start().unwrap();
    bus.send(0x44).unwrap();
    bus.stop().unwrap();

    dio.done();
    clk.done();
}

#[test]
fn two_wire_bus_missing_ack_is_not_an_error() {
    let mut dio_expectations = data_bits(0x40);
    dio_expectations.push(PinTransaction::set(State::High));
    dio_expectations.push(PinTransaction::get(State::High)); // nobody answers

    let mut clk_expectations = clock_pulses(8);
    clk_expectations.extend(clock_pulses(1));
    clk_expectations.push(PinTransaction::set(State::Low));

    let mut dio = PinMock::new(&dio_expectations);
    let mut clk = PinMock::new(&clk_expectations);

    let mut bus = TwoWireBus::with_ack(dio.clone(), clk.clone(), NoopDelay::new(), 5);
    assert!(bus.send(0x40).is_ok());

    dio.done();
    clk.done();
}

#[test]
fn two_wire_bus_without_ack() {
    let dio = PinMock::new(&data_bits(0xC3));
    let clk = PinMock::new(&clock_pulses(8));

    let mut bus = TwoWireBus::without_ack(dio, clk, NoopDelay::new(), 1);
    bus.send(0xC3).unwrap();

    let (mut dio, mut clk, _) = bus.release();
    dio.done();
    clk.done();
}
