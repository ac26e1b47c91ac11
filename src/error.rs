use crate::Cell;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("mine count {mines} leaves no safe cell on a {height}x{width} board")]
    InvalidConfiguration {
        height: usize,
        width: usize,
        mines: usize,
    },
    #[error("mine at {0:?} is outside the board")]
    MineOutOfBounds(Cell),
}
