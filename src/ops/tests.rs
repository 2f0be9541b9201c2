// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Floorgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Floorgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::{fixture, rstest};

use crate::config::EditorConfig;
use crate::model::fixtures::{grid_with_wall, open_grid};
use crate::model::{CellPos, CellState, GridError, PathMetrics, PointRole, RealExtent};
use crate::service::GridDocument;

use super::{
    EditError, EditMode, Editor, EditorEvent, GridSource, ProductDraft, ValidationError,
    DEFAULT_ALGORITHM,
};

fn pos(row: usize, col: usize) -> CellPos {
    CellPos::new(row, col)
}

#[fixture]
fn editor() -> Editor {
    Editor::new(EditorConfig::default(), open_grid(10, 10))
}

fn saved_with_route(mut editor: Editor) -> Editor {
    editor.mark_saved("grid-1".to_owned());
    editor.set_start(pos(0, 0)).expect("start");
    editor.set_end(pos(9, 9)).expect("end");
    editor
        .apply_path(vec![pos(0, 0), pos(1, 1), pos(9, 9)], PathMetrics::default())
        .expect("path");
    editor.drain_events();
    editor
}

#[rstest]
fn drag_applies_each_cell_once(mut editor: Editor) {
    editor.set_mode(EditMode::PaintObstacle);
    editor.drain_events();

    assert_eq!(editor.pointer_down(pos(0, 0)), Ok(true));
    let trail = [(0, 0), (0, 1), (0, 1), (0, 2), (0, 1), (0, 0), (1, 2), (0, 2), (1, 2)];
    for (row, col) in trail {
        editor.pointer_enter(pos(row, col)).expect("enter");
    }
    assert_eq!(editor.pointer_up(), Some(4));
    assert!(editor.drag().is_none());

    let changed = editor
        .drain_events()
        .into_iter()
        .filter_map(|event| match event {
            EditorEvent::CellsChanged(cells) => Some(cells),
            _ => None,
        })
        .flatten()
        .collect::<Vec<_>>();
    assert_eq!(changed, vec![pos(0, 0), pos(0, 1), pos(0, 2), pos(1, 2)]);
    assert_eq!(editor.grid().obstacle_count(), 4);
    assert!(editor.is_dirty());
}

#[rstest]
fn a_new_gesture_may_revisit_cells(mut editor: Editor) {
    editor.set_mode(EditMode::PaintObstacle);
    editor.pointer_down(pos(3, 3)).expect("down");
    editor.pointer_up();

    editor.set_mode(EditMode::PaintClear);
    assert_eq!(editor.pointer_down(pos(3, 3)), Ok(true));
    editor.pointer_up();
    assert_eq!(editor.grid().obstacle_count(), 0);
}

#[rstest]
fn stroke_keeps_its_paint_when_the_mode_changes(mut editor: Editor) {
    editor.set_mode(EditMode::PaintObstacle);
    editor.pointer_down(pos(5, 0)).expect("down");
    editor.set_mode(EditMode::PaintClear);
    editor.pointer_enter(pos(5, 1)).expect("enter");
    editor.pointer_up();

    assert_eq!(editor.grid().cell(pos(5, 1)), Ok(CellState::Obstacle));
}

#[rstest]
fn enter_without_a_stroke_does_nothing(mut editor: Editor) {
    editor.set_mode(EditMode::PaintObstacle);
    assert_eq!(editor.pointer_enter(pos(1, 1)), Ok(false));
    assert_eq!(editor.pointer_up(), None);
    assert_eq!(editor.grid().obstacle_count(), 0);
}

#[rstest]
fn painting_skips_routing_points_and_invalidates_the_path(editor: Editor) {
    let mut editor = saved_with_route(editor);
    assert!(!editor.needs_save());

    editor.set_mode(EditMode::PaintObstacle);
    assert_eq!(editor.pointer_down(pos(0, 0)), Ok(false));
    assert!(editor.path().is_some());
    editor.pointer_enter(pos(0, 1)).expect("enter");
    editor.pointer_up();

    assert!(!editor.grid().is_obstacle(pos(0, 0)));
    assert!(editor.grid().is_obstacle(pos(0, 1)));
    assert!(editor.path().is_none());
    assert!(editor.needs_save());
    assert!(editor.drain_events().contains(&EditorEvent::PathCleared));
}

#[rstest]
fn out_of_bounds_pointer_is_a_bounds_error(mut editor: Editor) {
    editor.set_mode(EditMode::PaintObstacle);
    let err = editor.pointer_down(pos(10, 0)).unwrap_err();
    assert!(matches!(err, EditError::Bounds(_)));
    assert!(!err.is_validation());
    assert!(editor.drag().is_none());
    assert_eq!(editor.grid().obstacle_count(), 0);
}

#[rstest]
fn point_clicks_on_obstacles_are_ignored() {
    let mut editor = Editor::new(EditorConfig::default(), grid_with_wall(5, 5, &[pos(1, 1)]));
    editor.set_mode(EditMode::SetStart);
    assert_eq!(editor.pointer_down(pos(1, 1)), Ok(false));
    editor.set_mode(EditMode::SetPickup);
    assert_eq!(editor.pointer_down(pos(1, 1)), Ok(false));
    assert!(editor.points().is_empty());
}

#[rstest]
fn start_and_end_replace_previous_cells(mut editor: Editor) {
    editor.set_mode(EditMode::SetStart);
    editor.pointer_down(pos(1, 1)).expect("start");
    editor.pointer_down(pos(2, 2)).expect("start again");
    assert_eq!(editor.points().start(), Some(pos(2, 2)));

    editor.set_mode(EditMode::SetEnd);
    editor.pointer_down(pos(2, 2)).expect("end over start");
    assert_eq!(editor.points().end(), Some(pos(2, 2)));
    assert_eq!(editor.points().start(), None);
    assert_eq!(editor.points().role_at(pos(2, 2)), Some(PointRole::End));
}

#[rstest]
fn pickup_toggle_is_an_involution(mut editor: Editor) {
    editor.set_mode(EditMode::SetPickup);
    let before = editor.points().clone();
    assert_eq!(editor.pointer_down(pos(4, 4)), Ok(true));
    assert_eq!(editor.points().pickup_count(), 1);
    assert_eq!(editor.pointer_down(pos(4, 4)), Ok(true));
    assert_eq!(editor.points(), &before);
}

#[rstest]
fn pickup_limit_is_enforced() {
    let config = EditorConfig { max_pickup_points: 2, ..EditorConfig::default() };
    let mut editor = Editor::new(config, open_grid(4, 4));
    editor.toggle_pickup(pos(0, 0)).expect("first");
    editor.toggle_pickup(pos(0, 1)).expect("second");

    let err = editor.toggle_pickup(pos(0, 2)).unwrap_err();
    assert_eq!(err, EditError::Validation(ValidationError::TooManyPickups { max: 2 }));
    assert_eq!(editor.points().pickup_count(), 2);

    // Removing is always allowed.
    assert_eq!(editor.toggle_pickup(pos(0, 0)), Ok(true));
}

#[rstest]
fn point_changes_clear_the_path(editor: Editor) {
    let mut editor = saved_with_route(editor);
    editor.set_mode(EditMode::SetPickup);
    editor.pointer_down(pos(5, 5)).expect("pickup");
    assert!(editor.path().is_none());

    let mut editor = saved_with_route(Editor::new(EditorConfig::default(), open_grid(10, 10)));
    assert!(editor.clear_all_points());
    assert!(editor.points().is_empty());
    assert!(editor.path().is_none());
    assert!(!editor.clear_all_points());
}

#[rstest]
fn mode_changes_clear_nothing(editor: Editor) {
    let mut editor = saved_with_route(editor);
    assert!(editor.set_mode(EditMode::PaintClear));
    assert!(!editor.set_mode(EditMode::PaintClear));
    assert!(editor.path().is_some());
    assert_eq!(editor.drain_events(), vec![EditorEvent::ModeChanged(EditMode::PaintClear)]);
}

#[rstest]
#[case(101, 10, GridSource::Manual, false)]
#[case(100, 100, GridSource::Manual, true)]
#[case(0, 10, GridSource::Manual, false)]
#[case(1000, 1000, GridSource::Suggested, true)]
#[case(1001, 10, GridSource::Suggested, false)]
fn initialize_grid_respects_source_limits(
    mut editor: Editor,
    #[case] rows: usize,
    #[case] columns: usize,
    #[case] source: GridSource,
    #[case] ok: bool,
) {
    let extent = RealExtent::new(10.0, 10.0).expect("extent");
    let generation = editor.generation();
    let result = editor.initialize_grid(rows, columns, extent, source);
    assert_eq!(result.is_ok(), ok);
    if ok {
        assert_eq!(editor.grid().rows(), rows);
        assert_eq!(editor.grid().walkable_count(), rows * columns);
        assert_eq!(editor.generation(), generation + 1);
    } else {
        assert!(result.unwrap_err().is_validation());
        assert_eq!(editor.grid().rows(), 10);
        assert_eq!(editor.generation(), generation);
    }
}

#[rstest]
fn grid_replacement_resets_session_state(editor: Editor) {
    let mut editor = saved_with_route(editor);
    editor.load_grid("grid-2".to_owned(), open_grid(6, 7));

    assert!(editor.points().is_empty());
    assert!(editor.path().is_none());
    assert_eq!(editor.grid_id(), Some("grid-2"));
    assert!(!editor.needs_save());
    assert_eq!(editor.drain_events(), vec![EditorEvent::GridReplaced { rows: 6, columns: 7 }]);

    let extent = RealExtent::new(5.0, 5.0).expect("extent");
    editor.initialize_grid(5, 5, extent, GridSource::Manual).expect("init");
    assert_eq!(editor.grid_id(), None);
    assert!(editor.needs_save());
}

#[rstest]
fn paths_for_an_older_route_epoch_are_discarded(editor: Editor) {
    let mut editor = saved_with_route(editor);
    editor.clear_path();
    let query = editor.path_request(None).expect("query");
    assert_eq!(query.route_epoch, editor.route_epoch());

    editor.set_mode(EditMode::PaintObstacle);
    editor.pointer_down(pos(4, 4)).expect("paint");
    editor.pointer_up();
    assert_ne!(editor.route_epoch(), query.route_epoch);

    let stale = vec![pos(0, 0), pos(4, 4), pos(9, 9)];
    let applied =
        editor.apply_path_for(query.route_epoch, stale, PathMetrics::default()).expect("in bounds");
    assert!(!applied);
    assert!(editor.path().is_none());

    let fresh = editor.path_request(None).expect("query");
    let applied = editor
        .apply_path_for(fresh.route_epoch, vec![pos(0, 0), pos(9, 9)], PathMetrics::default())
        .expect("in bounds");
    assert!(applied);
    assert_eq!(editor.path().map(|path| path.len()), Some(2));
}

#[rstest]
fn route_epoch_follows_points_and_obstacles(mut editor: Editor) {
    let mut epoch = editor.route_epoch();
    let mut bumped = |editor: &Editor| {
        let changed = editor.route_epoch() != epoch;
        epoch = editor.route_epoch();
        changed
    };

    editor.set_mode(EditMode::SetStart);
    assert!(!bumped(&editor));
    editor.set_start(pos(1, 1)).expect("start");
    assert!(bumped(&editor));
    editor.toggle_pickup(pos(3, 3)).expect("pickup");
    assert!(bumped(&editor));
    editor.set_start(pos(1, 1)).expect("same start");
    assert!(!bumped(&editor));
    editor.clear_all_points();
    assert!(bumped(&editor));
    assert_eq!(editor.clear_obstacles(), 0);
    assert!(!bumped(&editor));
}

fn stored(rows: usize, columns: usize, grid: Vec<Vec<u8>>) -> GridDocument {
    GridDocument {
        id: "stored-1".to_owned(),
        rows,
        columns,
        grid,
        actual_width: 12.0,
        actual_length: 8.0,
        image_id: None,
        timestamp: None,
    }
}

#[rstest]
fn load_document_installs_a_saved_grid(editor: Editor) {
    let mut editor = saved_with_route(editor);
    let doc = stored(2, 3, vec![vec![0, 1, 0], vec![0, 0, 1]]);

    editor.load_document(&doc).expect("load");

    assert_eq!(editor.grid_id(), Some("stored-1"));
    assert!(!editor.needs_save());
    assert!(editor.grid().is_obstacle(pos(0, 1)));
    assert!(editor.grid().is_obstacle(pos(1, 2)));
    assert_eq!(editor.grid().cell(pos(1, 0)), Ok(CellState::Walkable));
    assert!(editor.points().is_empty());
}

#[rstest]
fn load_document_rejects_a_shape_mismatch(editor: Editor) {
    let mut editor = saved_with_route(editor);
    let doc = stored(3, 3, vec![vec![0, 0, 0], vec![0, 0, 0]]);

    let err = editor.load_document(&doc).unwrap_err();

    assert_eq!(
        err,
        EditError::Validation(ValidationError::Grid(GridError::ShapeMismatch {
            declared: (3, 3),
            found: (2, 3),
        }))
    );
    assert_eq!(editor.grid_id(), Some("grid-1"));
    assert!(editor.path().is_some());
}

#[rstest]
fn path_request_needs_saved_grid_and_endpoints(mut editor: Editor) {
    assert_eq!(
        editor.path_request(None),
        Err(EditError::Validation(ValidationError::GridNotSaved))
    );
    editor.mark_saved("abc".to_owned());
    assert_eq!(
        editor.path_request(None),
        Err(EditError::Validation(ValidationError::MissingStart))
    );
    editor.set_start(pos(0, 0)).expect("start");
    assert_eq!(editor.path_request(None), Err(EditError::Validation(ValidationError::MissingEnd)));
    editor.set_end(pos(3, 3)).expect("end");
    editor.toggle_pickup(pos(2, 1)).expect("pickup");
    editor.toggle_pickup(pos(1, 2)).expect("pickup");

    let query = editor.path_request(None).expect("query");
    assert_eq!(query.grid_id, "abc");
    assert_eq!(query.algorithm, DEFAULT_ALGORITHM);
    assert_eq!(query.pickups, vec![pos(1, 2), pos(2, 1)]);
    assert_eq!(editor.path_request(Some("astar")).expect("query").algorithm, "astar");
}

#[rstest]
fn edits_during_a_save_keep_the_grid_dirty(mut editor: Editor) {
    editor.set_mode(EditMode::PaintObstacle);
    editor.pointer_down(pos(1, 1)).expect("paint");
    editor.pointer_up();
    let snapshot = editor.grid().to_matrix();

    editor.confirm_save("g1".to_owned(), &snapshot);
    assert!(!editor.needs_save());

    editor.pointer_down(pos(2, 2)).expect("paint");
    editor.pointer_up();
    editor.confirm_save("g2".to_owned(), &snapshot);
    assert_eq!(editor.grid_id(), Some("g2"));
    assert!(editor.is_dirty());
    assert!(editor.needs_save());
}

#[rstest]
fn apply_path_rejects_cells_outside_the_grid(mut editor: Editor) {
    let err = editor
        .apply_path(vec![pos(0, 0), pos(0, 10)], PathMetrics::default())
        .unwrap_err();
    assert_eq!(err, EditError::Validation(ValidationError::PathOutOfBounds { pos: pos(0, 10) }));
    assert!(editor.path().is_none());

    editor.apply_path(Vec::new(), PathMetrics::default()).expect("empty path");
    assert!(editor.path().is_some_and(|path| path.is_empty()));
}

#[rstest]
fn clear_obstacles_resets_grid_and_path(editor: Editor) {
    let mut editor = saved_with_route(editor);
    editor.set_mode(EditMode::PaintObstacle);
    editor.pointer_down(pos(4, 4)).expect("down");
    editor.pointer_enter(pos(4, 5)).expect("enter");
    editor.pointer_up();
    editor.drain_events();

    assert_eq!(editor.clear_obstacles(), 2);
    assert_eq!(editor.grid().obstacle_count(), 0);
    assert_eq!(editor.clear_obstacles(), 0);
}

#[rstest]
fn product_placement_validates_target(mut editor: Editor) {
    let draft = ProductDraft::parse("Widget, W1, 1, 2, 3, 4").expect("draft");
    assert_eq!(
        editor.product_placement(pos(1, 1), draft.clone()),
        Err(EditError::Validation(ValidationError::GridNotSaved))
    );

    editor.mark_saved("g".to_owned());
    assert!(matches!(
        editor.product_placement(pos(10, 1), draft.clone()),
        Err(EditError::Bounds(_))
    ));
    let placement = editor.product_placement(pos(1, 1), draft).expect("placement");
    assert_eq!(placement.grid_id, "g");
    assert_eq!(placement.pos, pos(1, 1));
}

#[test]
fn routes_around_an_obstacle_end_to_end() {
    let mut editor = Editor::new(EditorConfig::default(), open_grid(5, 5));
    editor.set_mode(EditMode::PaintObstacle);
    editor.pointer_down(pos(2, 3)).expect("wall");
    editor.pointer_up();

    editor.set_mode(EditMode::SetStart);
    editor.pointer_down(pos(2, 2)).expect("start");
    editor.set_mode(EditMode::SetEnd);
    editor.pointer_down(pos(2, 4)).expect("end");
    editor.mark_saved("five".to_owned());

    let query = editor.path_request(None).expect("query");
    assert_eq!((query.start, query.end), (pos(2, 2), pos(2, 4)));

    let detour = vec![pos(2, 2), pos(1, 2), pos(1, 3), pos(1, 4), pos(2, 4)];
    let metrics = PathMetrics {
        total_distance: Some(4.0),
        computation_time: Some(0.01),
        algorithm_used: Some("A*".to_owned()),
    };
    editor.apply_path(detour.clone(), metrics).expect("path");

    let path = editor.path().expect("path");
    assert_eq!(path.cells(), detour.as_slice());
    assert!(!path.cells().contains(&pos(2, 3)));

    let stats = editor.stats();
    assert_eq!(stats.path_cells, 5);
    assert_eq!(stats.obstacles, 1);
    assert!((stats.path_distance_m - 4.0).abs() < 1e-9);
}
