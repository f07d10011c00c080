use super::*;

fn at(x: f64, y: f64) -> ScreenPoint {
    ScreenPoint::new(x, y)
}

#[test]
fn new_menu_is_closed() {
    let menu = ContextMenu::new();
    assert!(!menu.is_open());
    assert_eq!(menu.state(), MenuState::Closed);
    assert!(menu.items(&Selection::new(), None).is_empty());
}

#[test]
fn open_captures_target_and_position() {
    let mut menu = ContextMenu::new();
    menu.open(2, at(10.0, 20.0));
    assert_eq!(menu.state(), MenuState::Open { target: 2, position: at(10.0, 20.0) });
    assert_eq!(menu.target(), Some(2));
}

#[test]
fn reopening_replaces_previous_menu() {
    let mut menu = ContextMenu::new();
    menu.open(2, at(10.0, 20.0));
    menu.open(0, at(1.0, 1.0));
    assert_eq!(menu.target(), Some(0));
}

#[test]
fn close_returns_to_closed() {
    let mut menu = ContextMenu::new();
    menu.open(1, at(0.0, 0.0));
    menu.close();
    assert!(menu.target().is_none());
}

#[test]
fn items_without_selection_offer_copy_edit_delete() {
    let mut menu = ContextMenu::new();
    menu.open(0, at(0.0, 0.0));
    assert_eq!(
        menu.items(&Selection::new(), None),
        vec![MenuItem::CopyAsText, MenuItem::StartEdit, MenuItem::Delete]
    );
}

#[test]
fn subtract_offered_only_for_target_in_pair() {
    let mut sel = Selection::new();
    sel.toggle(0, true);
    sel.toggle(1, true);

    let mut menu = ContextMenu::new();
    menu.open(1, at(0.0, 0.0));
    assert!(menu.items(&sel, None).contains(&MenuItem::Subtract));

    menu.open(2, at(0.0, 0.0));
    assert!(!menu.items(&sel, None).contains(&MenuItem::Subtract));

    sel.toggle(2, true);
    assert!(!menu.items(&sel, None).contains(&MenuItem::Subtract));
}

#[test]
fn edit_entry_flips_while_editing_target() {
    let mut menu = ContextMenu::new();
    menu.open(3, at(0.0, 0.0));
    assert!(menu.items(&Selection::new(), Some(3)).contains(&MenuItem::StopEdit));
    assert!(menu.items(&Selection::new(), Some(1)).contains(&MenuItem::StartEdit));
}
