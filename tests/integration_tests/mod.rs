mod beneficiaries;
mod merchants;
mod server;
