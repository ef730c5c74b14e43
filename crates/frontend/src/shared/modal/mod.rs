pub mod delete_dialog;
