use snake_puzzle_core::Direction;
use snake_puzzle_system_step_codec::{decode, encode, encode_append, Run, Steps, MAX_RUN_LENGTH};

fn scripted_path() -> Vec<Direction> {
    let mut path = Vec::new();
    path.extend(std::iter::repeat(Direction::Right).take(4));
    path.extend(std::iter::repeat(Direction::Down).take(12));
    path.push(Direction::Left);
    path.extend(std::iter::repeat(Direction::Up).take(3));
    path.extend(std::iter::repeat(Direction::Right).take(2));
    path
}

#[test]
fn decode_recovers_unit_step_count() {
    let path = scripted_path();
    let mut code = String::new();
    for direction in &path {
        encode_append(&mut code, *direction);
    }

    let steps = decode(&code).expect("encoded path decodes");

    assert_eq!(steps.length, path.len() as u64);
    assert_eq!(steps.code, code);
    assert_eq!(
        steps.runs,
        vec![
            Run {
                direction: Direction::Right,
                length: 4,
            },
            Run {
                direction: Direction::Down,
                length: 12,
            },
            Run {
                direction: Direction::Left,
                length: 1,
            },
            Run {
                direction: Direction::Up,
                length: 3,
            },
            Run {
                direction: Direction::Right,
                length: 2,
            },
        ],
    );
    assert_eq!(steps.directions().collect::<Vec<_>>(), path);
}

#[test]
fn runs_longer_than_one_pair_decode_as_single_run() {
    let length = MAX_RUN_LENGTH as usize * 2 + 5;
    let code = encode(std::iter::repeat(Direction::Down).take(length));

    assert_eq!(code.len(), 6, "three pairs expected, got {code}");

    let steps = decode(&code).expect("saturated runs decode");
    assert_eq!(steps.length, length as u64);
    assert_eq!(
        steps.runs,
        vec![Run {
            direction: Direction::Down,
            length: length as u32,
        }],
    );
}

#[test]
fn incremental_steps_agree_with_decode() {
    let mut steps = Steps::new();
    for direction in scripted_path() {
        steps.push(direction);
        let decoded = decode(&steps.code).expect("intermediate code decodes");
        assert_eq!(decoded, steps, "diverged after pushing {direction:?}");
    }
}

#[test]
fn hand_written_pairs_are_coalesced() {
    let steps = decode("101112").expect("valid pairs");

    assert_eq!(steps.length, 6);
    assert_eq!(
        steps.runs,
        vec![Run {
            direction: Direction::Right,
            length: 6,
        }],
    );
}
