use proptest::prelude::*;
use scaledbuffers::{
    ArrayDataBuffer, ArrayLayout, DataBuffer, Error, PodLayout, ScaledBuffer,
};

type U32View = ScaledBuffer<ArrayDataBuffer<u8>, PodLayout<u32>>;
type TripleView = ScaledBuffer<ArrayDataBuffer<i16>, ArrayLayout<3>>;

fn u32_view(values: &[u32]) -> U32View {
    let storage = ArrayDataBuffer::<u8>::new(values.len() * 4);
    let view = ScaledBuffer::new(storage, PodLayout::new()).unwrap();
    view.write(0, values).unwrap();
    view
}

fn triple_view(values: &[[i16; 3]]) -> TripleView {
    let flat: Vec<i16> = values.iter().flatten().copied().collect();
    ScaledBuffer::new(ArrayDataBuffer::from_vec(flat), ArrayLayout::<3>).unwrap()
}

// Values plus a window [index, index + size) inside them.
fn values_and_window() -> impl Strategy<Value = (Vec<u32>, usize, usize)> {
    prop::collection::vec(any::<u32>(), 0..24).prop_flat_map(|values| {
        let len = values.len();
        (Just(values), 0..=len).prop_flat_map(move |(values, index)| {
            (Just(values), Just(index), 0..=len - index)
        })
    })
}

proptest! {
    #[test]
    fn set_then_get_round_trips(
        values in prop::collection::vec(any::<u32>(), 1..24),
        replacement in any::<u32>(),
        pick in any::<prop::sample::Index>(),
    ) {
        let view = u32_view(&values);
        let index = pick.index(values.len());
        view.set(index, replacement).unwrap();
        prop_assert_eq!(view.get(index).unwrap(), replacement);
        for (k, value) in values.iter().enumerate().filter(|(k, _)| *k != index) {
            prop_assert_eq!(view.get(k).unwrap(), *value);
        }
    }

    #[test]
    fn slice_matches_parent((values, index, size) in values_and_window()) {
        let view = u32_view(&values);
        let window = view.slice(index, size).unwrap();
        prop_assert_eq!(window.len(), size);
        prop_assert_eq!(window.storage().len(), size * 4);
        for k in 0..size {
            prop_assert_eq!(window.get(k).unwrap(), view.get(index + k).unwrap());
        }
        prop_assert!(window.get(size).is_err());
    }

    #[test]
    fn offset_then_narrow_equals_slice((values, index, size) in values_and_window()) {
        let view = u32_view(&values);
        let chained = view.offset(index).unwrap().narrow(size).unwrap();
        let direct = view.slice(index, size).unwrap();
        prop_assert!(chained.content_eq(&direct).unwrap());
        prop_assert_eq!(view.offset(index).unwrap().len(), values.len() - index);
    }

    #[test]
    fn identity_windows(values in prop::collection::vec(any::<u32>(), 0..24)) {
        let view = u32_view(&values);
        prop_assert!(view.offset(0).unwrap().content_eq(&view).unwrap());
        prop_assert!(view.narrow(view.len()).unwrap().content_eq(&view).unwrap());
        prop_assert_eq!(view.to_vec().unwrap(), values);
    }

    #[test]
    fn windows_past_the_end_fail(
        values in prop::collection::vec(any::<u32>(), 0..24),
        excess in 1usize..8,
    ) {
        let view = u32_view(&values);
        let len = values.len();
        let is_window_error = |result: Result<U32View, Error>| {
            matches!(result, Err(Error::WindowOutOfBounds { .. }))
        };
        prop_assert!(is_window_error(view.offset(len + excess)));
        prop_assert!(is_window_error(view.narrow(len + excess)));
        prop_assert!(is_window_error(view.slice(len, excess)));
        prop_assert!(
            matches!(view.get(len), Err(Error::IndexOutOfBounds { .. })),
            "get past the end must fail"
        );
    }

    #[test]
    fn writes_through_windows_are_visible(
        values in prop::collection::vec(any::<[i16; 3]>(), 1..12),
        replacement in any::<[i16; 3]>(),
        pick in any::<prop::sample::Index>(),
    ) {
        let view = triple_view(&values);
        let index = pick.index(values.len());
        let window = view.slice(index, values.len() - index).unwrap();
        window.set(0, replacement).unwrap();
        prop_assert_eq!(view.get(index).unwrap(), replacement);

        let flat = view.storage().to_vec().unwrap();
        prop_assert_eq!(&flat[index * 3..index * 3 + 3], &replacement[..]);
    }
}

#[test]
fn twelve_units_with_scale_three() {
    let storage = ArrayDataBuffer::from_vec((0i16..12).collect());
    let view = ScaledBuffer::new(storage.clone(), ArrayLayout::<3>).unwrap();
    assert_eq!(view.len(), 4);
    assert_eq!(view.get(1).unwrap(), [3, 4, 5]);

    view.set(3, [-1, -2, -3]).unwrap();
    assert_eq!(storage.slice(9, 3).unwrap().to_vec().unwrap(), vec![-1, -2, -3]);
    assert_eq!(storage.narrow(9).unwrap().to_vec().unwrap(), (0i16..9).collect::<Vec<_>>());
}

#[test]
fn length_four_out_of_range_scenario() {
    let view = u32_view(&[10, 20, 30, 40]);
    assert!(matches!(view.offset(5), Err(Error::WindowOutOfBounds { index: 5, .. })));
    assert!(matches!(view.slice(2, 3), Err(Error::WindowOutOfBounds { index: 2, size: 3, len: 4 })));
    let narrowed = view.narrow(4).unwrap();
    assert!(narrowed.content_eq(&view).unwrap());
}

#[test]
fn zero_length_view_rejects_access() {
    let view = u32_view(&[1, 2, 3]);
    let empty = view.narrow(0).unwrap();
    assert_eq!(empty.len(), 0);
    assert!(matches!(empty.get(0), Err(Error::IndexOutOfBounds { index: 0, len: 0 })));
    assert!(matches!(empty.set(0, 9), Err(Error::IndexOutOfBounds { index: 0, len: 0 })));
    assert_eq!(view.to_vec().unwrap(), vec![1, 2, 3]);
}
