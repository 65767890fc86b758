//! 編集・Undo・形式切り替えの性質テスト

use proptest::prelude::*;
use scan_review_common::{Field, OutputFormat, ReviewSurface, ScanResult};

fn scan(fields: Vec<Field>) -> ScanResult {
    ScanResult {
        refined_data: fields,
        ..Default::default()
    }
}

fn arb_fields() -> impl Strategy<Value = Vec<Field>> {
    prop::collection::vec(("[A-Z][a-z]{0,8}", "[a-z0-9 ]{0,6}", 0u8..=100), 1..6).prop_map(|items| {
        items
            .into_iter()
            .map(|(field, value, confidence)| Field::new(field, value, confidence))
            .collect()
    })
}

fn arb_format() -> impl Strategy<Value = OutputFormat> {
    prop::sample::select(OutputFormat::ALL.to_vec())
}

proptest! {
    /// 値が変わる編集の回数 = 履歴の件数
    #[test]
    fn history_grows_only_on_changed_values(
        fields in arb_fields(),
        edits in prop::collection::vec((0usize..6, "[a-c]{0,2}"), 0..30),
    ) {
        let mut surface = ReviewSurface::new(scan(fields.clone()), OutputFormat::Excel);
        let mut changed = 0;
        for (index, value) in edits {
            let index = index % fields.len();
            let before = surface.field(index).unwrap().value.clone();
            let did_change = surface.set_value(index, &value);
            prop_assert_eq!(did_change, before != value);
            if did_change {
                changed += 1;
            }
            prop_assert_eq!(surface.history_len(), changed);
        }
    }

    /// 変更直後のUndoは変更前の項目列を完全に復元する
    #[test]
    fn undo_restores_exact_pre_change_state(
        fields in arb_fields(),
        index in 0usize..6,
        value in "[A-Z]{1,4}",
    ) {
        let index = index % fields.len();
        let mut surface = ReviewSurface::new(scan(fields), OutputFormat::Text);
        surface.set_value(index, "seed");
        let before = surface.fields().to_vec();
        let history_before = surface.history_len();

        if surface.set_value(index, &value) {
            prop_assert!(surface.undo());
        }
        prop_assert_eq!(surface.fields(), before.as_slice());
        prop_assert_eq!(surface.history_len(), history_before);
    }

    /// 形式を A→B→A と切り替えても項目・メモは変わらない
    #[test]
    fn format_switch_round_trip_preserves_state(
        fields in arb_fields(),
        a in arb_format(),
        b in arb_format(),
        note in "[a-z ]{0,10}",
    ) {
        let mut surface = ReviewSurface::new(scan(fields), a);
        surface.save_note(0, &note);
        let fields_before = surface.fields().to_vec();
        let notes_before = surface.note_map().clone();

        surface.set_format(b);
        surface.set_format(a);
        prop_assert_eq!(surface.fields(), fields_before.as_slice());
        prop_assert_eq!(surface.note_map(), &notes_before);
    }

    /// どの形式でも表示上の値を編集し直すと同じ値に戻る
    #[test]
    fn view_edit_round_trip_stores_clean_value(
        fields in arb_fields(),
        format in arb_format(),
        value in "[a-z\"]{0,8}",
    ) {
        let mut surface = ReviewSurface::new(scan(fields), format);
        let shown = format.present_value(&value);
        surface.edit_from_view(0, &shown);
        prop_assert_eq!(&surface.field(0).unwrap().value, &value);
    }
}

#[test]
fn scenario_single_field_edit_and_undo() {
    let mut surface = ReviewSurface::new(
        scan(vec![Field::new("Name", "Jon Doe", 80)]),
        OutputFormat::Excel,
    );
    surface.set_value(0, "John Doe");
    assert!(surface.undo());
    assert_eq!(surface.fields(), &[Field::new("Name", "Jon Doe", 80)]);
    assert_eq!(surface.history_len(), 0);
}

#[test]
fn scenario_repeated_same_value_records_once() {
    let mut surface = ReviewSurface::new(
        scan(vec![Field::new("Name", "Jon Doe", 80)]),
        OutputFormat::Excel,
    );
    surface.set_value(0, "X");
    surface.set_value(0, "X");
    assert_eq!(surface.history_len(), 1);
}

#[test]
fn scenario_empty_result_renders_no_data_everywhere() {
    let mut surface = ReviewSurface::new(scan(Vec::new()), OutputFormat::Excel);
    for format in OutputFormat::ALL {
        surface.set_format(format);
        let rendered = surface.view().to_string();
        assert!(rendered.contains("No data found in this document."), "{}", format);
    }
}
