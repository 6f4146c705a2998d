pub mod reddit;

#[cfg(test)]
mod tests;
