pub(crate) const DEFAULT_PREFIX: char = '-';
pub(crate) const SEPARATOR: &str = "--";
pub(crate) const HELP_SHORT: char = 'h';
pub(crate) const HELP_NAME: &str = "help";
pub(crate) const HELP_MESSAGE: &str = "show this help message and exit";
pub(crate) const TRUE_VALUE: &str = "true";
pub(crate) const FALSE_VALUE: &str = "false";
pub(crate) const ERROR_STATUS: i32 = 2;
