/*!
Command layer.

  parse.rs   token list -> ParsedCommand
  call.rs    default action: resolve, build, dispatch
  list.rs    endpoint listing (`-l`, `-l -j`)
  format.rs  table/color helpers for human output

Each action exposes one `execute_*` function.
*/

pub mod call;
pub mod format;
pub mod list;
pub mod parse;

pub use call::execute_call;
pub use list::{ListArgs, execute_list};
