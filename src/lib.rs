// Tidymark: small file-management tools.
//
// `organiser` sorts a directory into category folders by extension,
// `watermark` overlays text or an image onto a picture.

pub mod logging;
pub mod organiser;
pub mod watermark;
