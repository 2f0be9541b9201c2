// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Floorgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Floorgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Editing session wired to the in-memory backend: paint, save, route, render.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use tokio::runtime::Handle;

use floorgrid::config::{EditorConfig, RenderConfig};
use floorgrid::model::{CellPos, Grid, RealExtent};
use floorgrid::ops::{EditMode, Editor};
use floorgrid::render::{render_grid_text, PathOverlay, RenderSpeed};
use floorgrid::service::{
    GridDocument, GridPayload, MemoryBackend, PathRequest, PathResponse, RequestDispatcher,
    ServiceResult, WirePoint,
};

/// Breadth-first route over the stored matrix; pickups are ignored.
fn bfs(request: &PathRequest, grid: &GridDocument) -> Option<Vec<WirePoint>> {
    let start = (request.start.x, request.start.y);
    let end = (request.end.x, request.end.y);
    let mut parent = BTreeMap::from([(start, start)]);
    let mut queue = VecDeque::from([start]);
    while let Some((row, col)) = queue.pop_front() {
        if (row, col) == end {
            let mut path = vec![WirePoint { x: row, y: col }];
            let mut at = (row, col);
            while at != start {
                at = parent[&at];
                path.push(WirePoint { x: at.0, y: at.1 });
            }
            path.reverse();
            return Some(path);
        }
        let neighbours = [
            row.checked_sub(1).map(|r| (r, col)),
            (row + 1 < grid.rows).then_some((row + 1, col)),
            col.checked_sub(1).map(|c| (row, c)),
            (col + 1 < grid.columns).then_some((row, col + 1)),
        ];
        for next in neighbours.into_iter().flatten() {
            if grid.grid[next.0][next.1] == 0 && !parent.contains_key(&next) {
                parent.insert(next, (row, col));
                queue.push_back(next);
            }
        }
    }
    None
}

fn routing_backend() -> MemoryBackend {
    MemoryBackend::new().with_path_responder(Box::new(|request, grid| {
        let path = bfs(request, grid).unwrap_or_default();
        Ok(PathResponse {
            total_distance: Some(path.len().saturating_sub(1) as f64),
            path,
            computation_time: Some(0.001),
            algorithm_used: Some("bfs".to_owned()),
        })
    }))
}

fn paint_wall(editor: &mut Editor, cells: &[CellPos]) {
    editor.set_mode(EditMode::PaintObstacle);
    let (first, rest) = cells.split_first().expect("wall");
    editor.pointer_down(*first).expect("down");
    for &pos in rest {
        editor.pointer_enter(pos).expect("enter");
    }
    editor.pointer_up();
}

#[tokio::test]
async fn offline_session_saves_routes_and_renders() {
    let mut dispatcher = RequestDispatcher::new(Arc::new(routing_backend()), Handle::current());
    let grid = Grid::new(5, 8, RealExtent::new(8.0, 5.0).expect("extent")).expect("grid");
    let mut editor = Editor::new(EditorConfig::default(), grid);

    let wall = (0..4).map(|row| CellPos::new(row, 3)).collect::<Vec<_>>();
    paint_wall(&mut editor, &wall);
    editor.set_mode(EditMode::SetStart);
    editor.pointer_down(CellPos::new(0, 0)).expect("start");
    editor.set_mode(EditMode::SetEnd);
    editor.pointer_down(CellPos::new(0, 7)).expect("end");
    assert!(editor.needs_save());

    let snapshot = GridPayload::from_grid(editor.grid());
    let saved_matrix = snapshot.grid.clone();
    dispatcher.save_grid(editor.generation(), snapshot);
    let reply = dispatcher.recv().await.expect("save reply");
    assert_eq!(reply.generation, editor.generation());
    let ServiceResult::GridSaved(Ok(doc)) = reply.result else {
        panic!("grid was not saved");
    };
    editor.confirm_save(doc.id, &saved_matrix);
    assert!(!editor.needs_save());

    let query = editor.path_request(None).expect("query");
    dispatcher.find_path(editor.generation(), query.route_epoch, PathRequest::from(&query));
    let reply = dispatcher.recv().await.expect("path reply");
    let ServiceResult::PathFound { route_epoch, result: Ok(response) } = reply.result else {
        panic!("no path");
    };
    assert_eq!(route_epoch, editor.route_epoch());
    let applied = editor
        .apply_path_for(route_epoch, response.cells(), response.metrics())
        .expect("path fits the grid");
    assert!(applied);
    assert_eq!(dispatcher.in_flight(), 0);

    let path = editor.path().expect("path");
    assert_eq!(path.len(), 16);
    assert!(path.cells().contains(&CellPos::new(4, 3)));
    assert!(path.cells().iter().all(|&pos| !editor.grid().is_obstacle(pos)));
    // 15 unit moves on an 8 m x 5 m grid of 1 m cells.
    assert!((editor.stats().path_distance_m - 15.0).abs() < 1e-9);

    let render = RenderConfig { speed: RenderSpeed::Instant, ..RenderConfig::default() };
    let mut overlay = PathOverlay::new(&render);
    for event in editor.drain_events() {
        overlay.on_editor_event(&event, &editor);
    }
    assert_eq!(overlay.marked_count(), 14);

    let text = render_grid_text(editor.grid(), editor.points(), &overlay);
    let lines = text.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 5);
    assert!(lines[0].starts_with('S'));
    assert!(lines[0].ends_with('E'));
    assert!(lines.iter().take(4).all(|line| line.chars().nth(3) == Some('#')));
    assert_eq!(lines[4].chars().nth(3), Some('*'));
    assert_eq!(text.chars().filter(|&ch| ch == '*').count(), 14);
}

#[tokio::test]
async fn replaced_grids_make_earlier_replies_stale() {
    let mut dispatcher = RequestDispatcher::new(Arc::new(routing_backend()), Handle::current());
    let extent = RealExtent::new(4.0, 4.0).expect("extent");
    let mut editor = Editor::new(EditorConfig::default(), Grid::new(4, 4, extent).expect("grid"));

    let issued = editor.generation();
    dispatcher.save_grid(issued, GridPayload::from_grid(editor.grid()));
    editor
        .initialize_grid(6, 6, extent, floorgrid::ops::GridSource::Manual)
        .expect("new grid");

    let reply = dispatcher.recv().await.expect("reply");
    assert_eq!(reply.generation, issued);
    assert_ne!(reply.generation, editor.generation());
    assert!(!reply.result.is_err());
}
