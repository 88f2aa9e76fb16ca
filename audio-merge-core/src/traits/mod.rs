pub mod merge_delegate;
