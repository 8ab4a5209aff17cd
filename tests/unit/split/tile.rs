use super::*;

fn covered(tiles: &[Rect], w: i32, h: i32) -> bool {
    let mut hits = vec![0u8; (w * h) as usize];
    for t in tiles {
        if t.x < 0 || t.y < 0 || t.right() > w || t.bottom() > h {
            return false;
        }
        for y in t.y..t.bottom() {
            for x in t.x..t.right() {
                hits[(y * w + x) as usize] += 1;
            }
        }
    }
    hits.iter().all(|c| *c == 1)
}

#[test]
fn walker_covers_area_exactly() {
    for (w, h) in [(1, 1), (7, 3), (16, 16), (33, 17), (100, 9)] {
        for (sw, sh) in [(1, 1), (4, 5), (16, 16), (7, 100), (200, 2)] {
            let walker = TileWalker::new(w, h, sw, sh);
            let expected = (walker.cols() * walker.rows()) as usize;
            let tiles: Vec<Rect> = walker.collect();
            assert_eq!(tiles.len(), expected, "{w}x{h} by {sw}x{sh}");
            assert!(covered(&tiles, w, h), "{w}x{h} by {sw}x{sh}");
        }
    }
}

#[test]
fn remainder_tiles_shrink() {
    let walker = TileWalker::new(10, 7, 4, 3);
    assert_eq!((walker.last_width(), walker.last_height()), (2, 1));
    let tiles: Vec<Rect> = walker.collect();
    assert_eq!(tiles[2], Rect::new(8, 0, 2, 3));
    assert_eq!(tiles.last().copied(), Some(Rect::new(8, 6, 2, 1)));
}

#[test]
fn zero_step_means_one_tile() {
    let tiles: Vec<Rect> = TileWalker::new(5, 9, 0, 0).collect();
    assert_eq!(tiles, vec![Rect::new(0, 0, 5, 9)]);
}

#[test]
fn empty_area_has_no_tiles() {
    assert_eq!(TileWalker::new(0, 5, 1, 1).count(), 0);
}

#[test]
fn erratum_doubles_rotation_count() {
    assert_eq!(rot_count(16, 16), 1);
    assert_eq!(rot_count(16, 32), 1);
    assert_eq!(rot_count(16, 33), 2);
    assert_eq!(rot_count(17, 10), 2);
    assert_eq!(rot_count(40, 20), 6);
    assert_eq!(rot_count(5, 15), 1);
}

#[test]
fn strips_match_count_and_cover_block() {
    for (w, h) in [(1, 1), (16, 17), (40, 20), (33, 48), (5, 100)] {
        let strips: Vec<Rect> = rotation_strips(w, h).collect();
        assert_eq!(strips.len() as u32, rot_count(w, h), "{w}x{h}");
        assert!(covered(&strips, w, h), "{w}x{h}");
    }
}

#[test]
fn walker_stops_at_the_coordinate_limit() {
    let tiles: Vec<Rect> = TileWalker::new(i32::MAX, 1, i32::MAX - 1, 1).collect();
    assert_eq!(
        tiles,
        vec![Rect::new(0, 0, i32::MAX - 1, 1), Rect::new(i32::MAX - 1, 0, 1, 1)]
    );
}
