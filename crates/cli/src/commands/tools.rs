//! `ragent tools`: list the tools the agent can call.

pub fn run() {
    let registry = ragent_tools::default_registry();
    println!("Available tools ({}):", registry.len());
    for tool in registry.descriptors() {
        println!("  {:<22} {}", tool.name, tool.description);
    }
}
