use crate::filter::{AcceptanceFilter, FilterMode, IdRange, MessageFilter};
use crate::parameter::FilterState;

#[test]
fn test_filter_mode() {
    assert_eq!(0x00, FilterMode::Standard as u8);
    assert_eq!(0x02, FilterMode::Extended as u8);
    assert_eq!(Some(FilterMode::Extended), FilterMode::from_raw(0x02));
    assert_eq!(None, FilterMode::from_raw(0x01));
    assert_eq!(0x7FF, FilterMode::Standard.max_id());
    assert_eq!(0x1FFF_FFFF, FilterMode::Extended.max_id());
}

#[test]
fn test_id_range() {
    let range = IdRange::new(0x100, 0x1FF, FilterMode::Standard).unwrap();

    assert_eq!(0x100, range.from_id());
    assert_eq!(0x1FF, range.to_id());
    assert_eq!(FilterMode::Standard, range.mode());
    assert!(range.contains(0x100));
    assert!(range.contains(0x1FF));
    assert!(!range.contains(0x0FF));
    assert!(!range.contains(0x200));

    let single = IdRange::single(0x1234_5678, FilterMode::Extended).unwrap();
    assert!(single.contains(0x1234_5678));
    assert!(!single.contains(0x1234_5679));
}

#[test]
fn test_id_range_invalid() {
    assert_eq!(None, IdRange::new(0x200, 0x100, FilterMode::Standard));
    assert_eq!(None, IdRange::new(0x000, 0x800, FilterMode::Standard));
    assert_eq!(None, IdRange::new(0x000, 0x2000_0000, FilterMode::Extended));
    assert!(IdRange::new(0x000, 0x1FFF_FFFF, FilterMode::Extended).is_some());
}

#[test]
fn test_message_filter_state() {
    assert_eq!(FilterState::Close, FilterState::from(MessageFilter::Close));
    assert_eq!(FilterState::Open, FilterState::from(MessageFilter::Open));
}

#[test]
fn test_acceptance_filter_value() {
    let filter = AcceptanceFilter::new(0x1234_5678, 0x0000_00FF, FilterMode::Extended).unwrap();

    assert_eq!(0x1234_5678_0000_00FF, filter.value());
    assert_eq!(0x1234_5678, filter.code());
    assert_eq!(0x0000_00FF, filter.mask());
    assert_eq!(Some(filter), AcceptanceFilter::from_value(filter.value(), FilterMode::Extended));

    // code outside the 11-bit space
    assert_eq!(None, AcceptanceFilter::from_value(0x0000_0800_0000_0000, FilterMode::Standard));
    assert_eq!(None, AcceptanceFilter::new(0x000, 0x800, FilterMode::Standard));
}

#[test]
fn test_acceptance_filter_accepts() {
    let filter = AcceptanceFilter::new(0x120, 0x00F, FilterMode::Standard).unwrap();

    assert!(filter.accepts(0x120));
    assert!(filter.accepts(0x12F));
    assert!(!filter.accepts(0x130));
    assert!(!filter.accepts(0x020));

    // exact match
    let filter = AcceptanceFilter::new(0x555, 0x000, FilterMode::Standard).unwrap();
    assert!(filter.accepts(0x555));
    assert!(!filter.accepts(0x554));
}

#[test]
fn test_acceptance_filter_open() {
    let filter = AcceptanceFilter::open(FilterMode::Standard);

    assert_eq!(0x0000_0000_0000_07FF, filter.value());
    assert!(filter.accepts(0x000));
    assert!(filter.accepts(0x7FF));

    let filter = AcceptanceFilter::open(FilterMode::Extended);
    assert_eq!(0x0000_0000_1FFF_FFFF, filter.value());
    assert!(filter.accepts(0x1ABC_DEF0));
}
