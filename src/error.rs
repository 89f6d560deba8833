//! Client input errors raised by the resolver and the matcher.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecipeError {
    /// The upload carried no file, or the file had an empty name.
    #[error("No file uploaded")]
    NoFileUploaded,

    /// Every ingredient was blank after trimming.
    #[error("Podaj co najmniej jeden składnik")]
    NoIngredients,
}
