//! Behavioural coverage for slicing listings into pages.

use pagination::{PageRequest, Paginator};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

#[fixture]
fn paginator() -> Paginator {
    Paginator::new(10).expect("valid page size")
}

#[rstest]
fn thirteen_items_split_ten_then_three(paginator: Paginator) {
    let items: Vec<u32> = (0..13).collect();

    let first = paginator.paginate(items.clone(), PageRequest::Number(1));
    let second = paginator.paginate(items, PageRequest::Number(2));

    assert_eq!(first.len(), 10);
    assert_eq!(second.len(), 3);
    assert_eq!(second.items(), &[10, 11, 12]);
}

#[rstest]
#[case(PageRequest::Number(0), 1)]
#[case(PageRequest::Number(-1), 1)]
#[case(PageRequest::Number(3), 2)]
#[case(PageRequest::Last, 2)]
fn out_of_range_requests_clamp(
    paginator: Paginator,
    #[case] request: PageRequest,
    #[case] expected: u64,
) {
    let page = paginator.paginate((0..13).collect::<Vec<_>>(), request);
    assert_eq!(page.number(), expected);
}

#[rstest]
fn same_input_yields_same_slice(paginator: Paginator) {
    let items: Vec<u32> = (0..25).collect();
    let once = paginator.paginate(items.clone(), PageRequest::Number(2));
    let twice = paginator.paginate(items, PageRequest::Number(2));
    assert_eq!(once, twice);
}

#[rstest]
fn map_preserves_navigation(paginator: Paginator) {
    let page = paginator
        .paginate((0..13).collect::<Vec<u32>>(), PageRequest::FIRST)
        .map(|value| value.to_string());

    assert_eq!(page.items().first().map(String::as_str), Some("0"));
    assert!(page.has_next());
    assert_eq!(page.next_page_number(), Some(2));
    assert_eq!(page.previous_page_number(), None);
}

#[rstest]
fn serialises_navigation_fields(paginator: Paginator) {
    let page = paginator.paginate(vec!["a", "b"], PageRequest::FIRST);
    let value = serde_json::to_value(&page).expect("page serialises");

    assert_eq!(
        value,
        json!({
            "items": ["a", "b"],
            "number": 1,
            "num_pages": 1,
            "count": 2,
            "has_next": false,
            "has_previous": false,
            "next_page_number": Value::Null,
            "previous_page_number": Value::Null,
        })
    );
}
